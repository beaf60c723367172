use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{info, warn};
use std::io;

use task_organizer::auth::{provision_account, TokenService};
use task_organizer::config::Config;
use task_organizer::routes::{self, health};
use task_organizer::storage::{PostgresStorage, Storage};

fn to_io(err: task_organizer::AppError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    let storage = match &config.database_url {
        Some(url) => {
            info!("using Postgres storage");
            Storage::postgres(PostgresStorage::connect(url).await.map_err(to_io)?)
        }
        None => {
            warn!("DATABASE_URL not set, tasks are kept in memory and lost on exit");
            Storage::memory()
        }
    };

    if let Some(seed) = &config.seed_account {
        provision_account(storage.credentials.as_ref(), &seed.username, &seed.password)
            .await
            .map_err(to_io)?;
    }

    let tokens = web::Data::new(TokenService::new(&config.jwt));

    info!("Starting task organizer at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .configure(|cfg| storage.configure(cfg))
            .app_data(tokens.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
