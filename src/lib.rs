#![doc = "The `task_organizer` library crate."]
#![doc = ""]
#![doc = "Task records behind a bearer-token login: domain models, the token guard,"]
#![doc = "storage backends, route configuration and error handling. The binary"]
#![doc = "(`main.rs`) loads the configuration, picks a storage backend and serves the app."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod storage;

pub use crate::error::AppError;
