mod clinica;
mod lookup;

pub use clinica::ClinicaError;
pub use lookup::LookupError;

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}
