use serde::{Deserialize, Serialize};

use crate::error::{RosterError, RosterErrorKind};

pub const FIELD_COUNT: usize = 10;

const FIELD_SEPARATOR: &str = ", ";
const LABEL_SEPARATOR: &str = ": ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Every word of the name except the last one; may be empty.
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub sex: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub bmi: f64,
    pub diet: String,
    pub allergy: String,
    pub pathology: String,
    pub drug: String,
}

impl PatientRecord {
    /// Free-text clinical notes stored alongside the imported patient.
    pub fn medical_notes(&self) -> String {
        format!(
            "Dieta: {}, Allergia: {}, Diagnosi: {}, Farmaci: {}",
            self.diet, self.allergy, self.pathology, self.drug
        )
    }
}

/// Parses a whole roster. Blank lines are skipped; the first malformed line
/// aborts with its 1-based line number.
pub fn parse_roster(input: &str) -> Result<Vec<PatientRecord>, RosterError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_line(line).map_err(|kind| RosterError {
                line: idx + 1,
                kind,
            })
        })
        .collect()
}

pub fn parse_line(line: &str) -> Result<PatientRecord, RosterErrorKind> {
    let fields: Vec<&str> = line.trim().split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(RosterErrorKind::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let (first_name, last_name) = split_name(fields[0])?;
    let age = leading_number::<u32>("age", fields[1])?;
    let sex = fields[2].trim().to_string();
    let weight_kg = leading_number::<f64>("weight", labelled("weight", fields[3])?)?;
    let height_cm = leading_number::<f64>("height", labelled("height", fields[4])?)?;
    let bmi = leading_number::<f64>("bmi", labelled("bmi", fields[5])?)?;

    Ok(PatientRecord {
        first_name,
        last_name,
        age,
        sex,
        weight_kg,
        height_cm,
        bmi,
        diet: labelled("diet", fields[6])?.to_string(),
        allergy: labelled("allergy", fields[7])?.to_string(),
        pathology: labelled("pathology", fields[8])?.to_string(),
        drug: labelled("drug", fields[9])?.to_string(),
    })
}

fn split_name(raw: &str) -> Result<(String, String), RosterErrorKind> {
    let words: Vec<&str> = raw.split_whitespace().collect();
    match words.split_last() {
        Some((last, rest)) => Ok((rest.join(" "), (*last).to_string())),
        None => Err(RosterErrorKind::EmptyName),
    }
}

/// Value part of `Label: value`, trimmed.
fn labelled<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, RosterErrorKind> {
    raw.split_once(LABEL_SEPARATOR)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or(RosterErrorKind::MissingValue { field })
}

/// First whitespace-separated token parsed as a number, so units are ignored.
fn leading_number<T: std::str::FromStr>(
    field: &'static str,
    raw: &str,
) -> Result<T, RosterErrorKind> {
    let token = raw.split_whitespace().next().unwrap_or_default();
    token.parse::<T>().map_err(|_| RosterErrorKind::InvalidNumber {
        field,
        value: token.to_string(),
    })
}
