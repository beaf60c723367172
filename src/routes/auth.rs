use crate::{
    auth::{self, LoginRequest, TokenResponse, TokenService},
    error::AppError,
    storage::CredentialRepository,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Login user
///
/// Checks the credentials and returns `{"token": ...}`. Unknown usernames and
/// wrong passwords both answer 401 with the same body.
#[post("/login")]
pub async fn login(
    credentials: web::Data<dyn CredentialRepository>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let token = auth::login(
        credentials.get_ref(),
        tokens.get_ref(),
        &login_data.username,
        &login_data.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
