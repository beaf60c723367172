//! Persistence handles.
//!
//! Handlers never reach a database directly: they receive a `TaskRepository`
//! and a `CredentialRepository` through `web::Data<dyn ...>`. `Storage` bundles
//! one implementation of each and registers them on an Actix app.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppError;
use crate::models::{Credential, NewTask, Task, TaskStatus};

pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;

/// Task persistence. Every listing is ordered by id.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, AppError>;

    async fn find_all(&self) -> Result<Vec<Task>, AppError>;

    /// Case-sensitive substring match on the title.
    async fn find_by_title(&self, fragment: &str) -> Result<Vec<Task>, AppError>;

    /// Tasks due on `day`, any time of day.
    async fn find_by_date(&self, day: NaiveDate) -> Result<Vec<Task>, AppError>;

    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, AppError>;

    /// Assigns a fresh identifier and stores the task.
    async fn insert(&self, task: NewTask) -> Result<Task, AppError>;

    /// Overwrites every field but the id. `None` when no task has that id.
    async fn update(&self, id: i32, task: NewTask) -> Result<Option<Task>, AppError>;

    /// `false` when no task has that id.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

/// Credential lookup. Inserting is only used to provision accounts at start-up.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, AppError>;

    async fn insert(&self, username: &str, password_hash: &str) -> Result<Credential, AppError>;
}

/// The pair of repositories an app is served with.
#[derive(Clone)]
pub struct Storage {
    pub tasks: Arc<dyn TaskRepository>,
    pub credentials: Arc<dyn CredentialRepository>,
}

impl Storage {
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStorage::default());
        Self {
            tasks: store.clone(),
            credentials: store,
        }
    }

    pub fn postgres(store: PostgresStorage) -> Self {
        let store = Arc::new(store);
        Self {
            tasks: store.clone(),
            credentials: store,
        }
    }

    /// Registers both repositories as app data.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.tasks.clone()))
            .app_data(web::Data::from(self.credentials.clone()));
    }
}
