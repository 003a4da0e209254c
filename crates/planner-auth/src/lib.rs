//! Planner Auth: password credentials and opaque session tokens.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, Identity, LoginInput, LoginOutput, RegisterInput, Registered};
