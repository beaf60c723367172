use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{CredentialRepository, TaskRepository};
use crate::error::AppError;
use crate::models::{Credential, NewTask, Task, TaskStatus};

const TASK_COLUMNS: &str = "id, title, description, due_date, status";

/// Postgres-backed repositories sharing one connection pool.
#[derive(Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and applies the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl TaskRepository for PostgresStorage {
    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn find_all(&self) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks ORDER BY id",
            TASK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn find_by_title(&self, fragment: &str) -> Result<Vec<Task>, AppError> {
        // strpos is case-sensitive and, unlike LIKE, treats % and _ literally
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE strpos(title, $1) > 0 ORDER BY id",
            TASK_COLUMNS
        ))
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn find_by_date(&self, day: NaiveDate) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE due_date::date = $1 ORDER BY id",
            TASK_COLUMNS
        ))
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE status = $1 ORDER BY id",
            TASK_COLUMNS
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn insert(&self, task: NewTask) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (title, description, due_date, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task.title)
        .bind(task.description)
        .bind(task.due_date)
        .bind(task.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update(&self, id: i32, task: NewTask) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET title = $1, description = $2, due_date = $3, status = $4
             WHERE id = $5
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task.title)
        .bind(task.description)
        .bind(task.due_date)
        .bind(task.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CredentialRepository for PostgresStorage {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, AppError> {
        let credential = sqlx::query_as::<_, Credential>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credential)
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<Credential, AppError> {
        let credential = sqlx::query_as::<_, Credential>(
            "INSERT INTO users (username, password_hash)
             VALUES ($1, $2)
             RETURNING id, username, password_hash",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| match error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::BadRequest(format!("Username {:?} is already taken", username))
            }
            error => AppError::from(error),
        })?;

        Ok(credential)
    }
}
