pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers `/auth` (public) and `/tarefa` (behind `AuthMiddleware`).
///
/// The fixed `/tarefa/Obter*` listings are registered before `/tarefa/{id}`.
/// Body and query-string decoding failures are answered like any other
/// `AppError::BadRequest`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(web::scope("/auth").service(auth::login))
    .service(
        web::scope("/tarefa")
            .wrap(AuthMiddleware)
            .service(tasks::get_all_tasks)
            .service(tasks::get_tasks_by_title)
            .service(tasks::get_tasks_by_date)
            .service(tasks::get_tasks_by_status)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
