pub mod guards;
pub mod router;
pub mod routes;

pub use router::{ClinicaState, clinica_router};
