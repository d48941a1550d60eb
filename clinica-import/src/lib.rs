//! Parser for the fixed-format patient roster files.
//!
//! One patient per line, ten `", "`-separated fields:
//!
//! ```text
//! Mario Rossi, 45 anni, M, Peso: 82.5 kg, Altezza: 178 cm, BMI: 26.0, Dieta: Mediterranea, Allergia: Nessuna, Patologia: Ipertensione, Farmaco: Ramipril
//! ```

mod error;
mod parser;

pub use error::{RosterError, RosterErrorKind};
pub use parser::{FIELD_COUNT, PatientRecord, parse_line, parse_roster};
