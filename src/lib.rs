pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod leave;
pub mod model;
pub mod models;
pub mod routes;
pub mod scoring;

pub use api::ApiClient;
pub use auth::{Session, SessionContext, SessionStore};
pub use config::Config;
pub use error::{ClientError, Result};
