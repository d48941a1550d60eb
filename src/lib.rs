pub mod auth;
pub mod calc;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod lookup;
pub mod render;
pub mod server;
pub mod utils;

pub use error::ClinicaError;
