use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{DateQuery, StatusQuery, TaskInput, TitleQuery},
    storage::TaskRepository,
};
use actix_web::{delete, get, http::header, post, put, web, HttpRequest, HttpResponse, Responder};
use log::info;

/// Retrieves a single task by its identifier.
///
/// ## Responses:
/// - `200 OK`: the `Task` as JSON.
/// - `404 Not Found`: no task exists with that id (empty body).
#[get("/{id}", name = "get_task")]
pub async fn get_task(
    tasks: web::Data<dyn TaskRepository>,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .find_by_id(task_id.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Lists every task, ordered by id.
#[get("/ObterTodos")]
pub async fn get_all_tasks(
    tasks: web::Data<dyn TaskRepository>,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(tasks.find_all().await?))
}

/// Lists tasks whose title contains `titulo` (case-sensitive).
/// An empty result is still `200 OK`.
#[get("/ObterPorTitulo")]
pub async fn get_tasks_by_title(
    tasks: web::Data<dyn TaskRepository>,
    query: web::Query<TitleQuery>,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(tasks.find_by_title(&query.titulo).await?))
}

/// Lists tasks due on the calendar day of `data`; the time of day is ignored.
///
/// `data` accepts `YYYY-MM-DD` or a full timestamp. Anything else is `400`.
#[get("/ObterPorData")]
pub async fn get_tasks_by_date(
    tasks: web::Data<dyn TaskRepository>,
    query: web::Query<DateQuery>,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(tasks.find_by_date(query.data).await?))
}

/// Lists tasks with exactly the given `status`
/// (`Pendente`, `EmAndamento`, `Finalizado`, `Cancelado`, `Atrasado`).
#[get("/ObterPorStatus")]
pub async fn get_tasks_by_status(
    tasks: web::Data<dyn TaskRepository>,
    query: web::Query<StatusQuery>,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(tasks.find_by_status(query.status).await?))
}

/// Creates a new task.
///
/// ## Request Body:
/// `{"titulo", "descricao", "data", "status"}`; only `data` is required.
///
/// ## Responses:
/// - `201 Created`: the stored `Task`, with a `Location` header for `get_task`.
/// - `400 Bad Request`: `data` is missing, empty or `0001-01-01T00:00:00`.
#[post("")]
pub async fn create_task(
    req: HttpRequest,
    tasks: web::Data<dyn TaskRepository>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let new_task = task_data.into_inner().into_new_task()?;
    let task = tasks.insert(new_task).await?;
    info!("{} created task {}", user.username(), task.id);

    let location = req
        .url_for("get_task", [task.id.to_string()])
        .map_err(|e| AppError::InternalServerError(format!("Failed to build location: {}", e)))?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location.as_str()))
        .json(task))
}

/// Replaces title, description, due date and status of an existing task.
///
/// Existence is checked before the body is decoded, so an unknown id is always
/// `404`, even for a body that is not a valid `TaskInput`.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `404 Not Found`: no task exists with that id.
/// - `400 Bad Request`: the body does not decode, or `data` is unset; the stored
///   task is left unchanged.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<dyn TaskRepository>,
    task_id: web::Path<i32>,
    body: web::Bytes,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = task_id.into_inner();
    if tasks.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let input: TaskInput = serde_json::from_slice(&body)?;
    let changes = input.into_new_task()?;
    // the task may have been deleted in between
    let task = tasks.update(id, changes).await?.ok_or(AppError::NotFound)?;
    info!("{} updated task {}", user.username(), id);

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task permanently.
///
/// ## Responses:
/// - `204 No Content`: the task was removed.
/// - `404 Not Found`: no task exists with that id.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<dyn TaskRepository>,
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = task_id.into_inner();
    if !tasks.delete(id).await? {
        return Err(AppError::NotFound);
    }
    info!("{} deleted task {}", user.username(), id);

    Ok(HttpResponse::NoContent().finish())
}
