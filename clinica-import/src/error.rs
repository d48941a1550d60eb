use thiserror::Error;

/// A roster line that could not be parsed. Aborts the whole import.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {kind}")]
pub struct RosterError {
    /// 1-based line number in the input.
    pub line: usize,
    pub kind: RosterErrorKind,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RosterErrorKind {
    #[error("expected {expected} fields separated by \", \", found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("patient name is empty")]
    EmptyName,

    #[error("field `{field}` has no `Label: value` pair")]
    MissingValue { field: &'static str },

    #[error("field `{field}` is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}
