use actix_cors::Cors;
use actix_web::{
    self,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http,
    middleware::{from_fn, Logger},
    web, App, HttpServer,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::connect_database,
    constants::{ROLE_ADMIN, ROLE_USER},
    middlewares::{authentication, authorization},
    modules::{
        friend::{repository_pg::FriendRepositoryPg, service::FriendService},
        stats::{repository_pg::StatsRepositoryPg, service::StatsService},
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

/// Everything under `/api`. Account creation, login and token refresh are
/// public, the rest needs an access token.
fn api_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api").configure(modules::user::route::public_api_configure).service(
            web::scope("")
                .wrap(from_fn(authorization(vec![ROLE_USER, ROLE_ADMIN])))
                .wrap(from_fn(authentication))
                .configure(modules::user::route::configure)
                .configure(modules::friend::route::configure)
                .configure(modules::stats::route::configure),
        ),
    );
}

fn cors() -> Cors {
    Cors::default()
        .allowed_origin(&ENV.frontend_url)
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}

/// The whole application around the given services.
pub fn build_app(
    user_service: UserService,
    friend_service: FriendService,
    stats_service: StatsService,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(cors())
        .wrap(Logger::default())
        .app_data(web::Data::new(user_service))
        .app_data(web::Data::new(friend_service))
        .app_data(web::Data::new(stats_service))
        .service(health_check)
        .configure(api_configure)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let friend_repo = Arc::new(FriendRepositoryPg::new(db_pool.clone()));
    let stats_repo = Arc::new(StatsRepositoryPg::new(db_pool.clone()));

    let user_service = UserService::with_dependencies(user_repo.clone(), user_repo.clone());
    let friend_service =
        FriendService::with_dependencies(friend_repo, user_repo.clone(), stats_repo.clone());
    let stats_service = StatsService::with_dependencies(stats_repo, user_repo);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        build_app(user_service.clone(), friend_service.clone(), stats_service.clone())
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
