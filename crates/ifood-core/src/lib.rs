//! Core iFood library (config, credentials, API client, session, navigation).

pub mod api;
pub mod config;
pub mod core;
pub mod credentials;
pub mod error;

pub use error::{IfoodError, Result};
