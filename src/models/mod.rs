pub mod task;
pub mod user;

pub use task::{DateQuery, NewTask, StatusQuery, Task, TaskInput, TaskStatus, TitleQuery};
pub use user::Credential;
