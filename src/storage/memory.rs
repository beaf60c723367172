use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::{CredentialRepository, TaskRepository};
use crate::error::AppError;
use crate::models::{Credential, NewTask, Task, TaskStatus};

#[derive(Default)]
struct Tables {
    last_task_id: i32,
    last_credential_id: i32,
    tasks: BTreeMap<i32, Task>,
    credentials: BTreeMap<String, Credential>,
}

/// Process-local store used when no database is configured, and by the tests.
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    async fn filter_tasks<F>(&self, predicate: F) -> Vec<Task>
    where
        F: Fn(&Task) -> bool,
    {
        self.tables
            .read()
            .await
            .tasks
            .values()
            .filter(|task| predicate(*task))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TaskRepository for MemoryStorage {
    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, AppError> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.filter_tasks(|_| true).await)
    }

    async fn find_by_title(&self, fragment: &str) -> Result<Vec<Task>, AppError> {
        Ok(self.filter_tasks(|task| task.title_contains(fragment)).await)
    }

    async fn find_by_date(&self, day: NaiveDate) -> Result<Vec<Task>, AppError> {
        Ok(self.filter_tasks(|task| task.is_due_on(day)).await)
    }

    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, AppError> {
        Ok(self.filter_tasks(|task| task.status == status).await)
    }

    async fn insert(&self, task: NewTask) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        tables.last_task_id += 1;
        let task = task.with_id(tables.last_task_id);
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, id: i32, task: NewTask) -> Result<Option<Task>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.tasks.get_mut(&id).map(|stored| {
            *stored = task.with_id(id);
            stored.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tables.write().await.tasks.remove(&id).is_some())
    }
}

#[async_trait]
impl CredentialRepository for MemoryStorage {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, AppError> {
        Ok(self.tables.read().await.credentials.get(username).cloned())
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<Credential, AppError> {
        let mut tables = self.tables.write().await;
        if tables.credentials.contains_key(username) {
            return Err(AppError::BadRequest(format!(
                "Username {:?} is already taken",
                username
            )));
        }

        tables.last_credential_id += 1;
        let credential = Credential {
            id: tables.last_credential_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        tables
            .credentials
            .insert(credential.username.clone(), credential.clone());
        Ok(credential)
    }
}
