pub mod auth;

pub use auth::{AuthRejection, MaybeDoctor, RequireDoctor};
