pub mod pubchem;
pub mod wikipedia;

pub use pubchem::{CompoundProperties, PubChemFault, PubChemFaultBody, PubChemPropertyResponse};
pub use wikipedia::{PageSummary, SummaryKind};
