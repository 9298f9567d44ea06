//! Paceline Backend Server
//!
//! Single actix-web server combining cookie-authenticated group management
//! with the anonymous secret-code join flow.
//!
//! ## Submodules
//!
//! - [`events`] — event CRUD, public preview, and participant admission
//! - [`groups`] — administrative group account management
//! - [`members`] — owner-scoped member management

pub mod events;
pub mod groups;
pub mod members;

mod caches;
pub use caches::Caches;

use paceline_auth::Group;
use paceline_auth::Session;
use paceline_records::Event;
use paceline_records::Member;
use paceline_records::Participant;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::middleware::from_fn;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

async fn health(client: web::Data<Arc<Client>>) -> impl Responder {
    match client
        .execute("SELECT 1", &[])
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

/// Creates all tables and indices if absent. Order follows foreign keys.
async fn sync(client: &Client) -> Result<(), paceline_pg::PgErr> {
    paceline_pg::ensure::<Group>(client).await?;
    paceline_pg::ensure::<Session>(client).await?;
    paceline_pg::ensure::<Member>(client).await?;
    paceline_pg::ensure::<Event>(client).await?;
    paceline_pg::ensure::<Participant>(client).await
}

#[rustfmt::skip]
pub async fn run() -> Result<(), std::io::Error> {
    let client = paceline_pg::db().await;
    sync(&client).await.expect("schema sync");
    let crypto = web::Data::new(paceline_auth::Crypto::from_env());
    let caches = web::Data::new(Caches::new());
    let client = web::Data::new(client);
    log::info!("starting paceline server");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(from_fn(paceline_auth::guard::guard))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(crypto.clone())
            .app_data(caches.clone())
            .app_data(client.clone())
            .route("/health", web::get().to(health))
            .service(
                web::scope("/api/auth")
                    .route("/login", web::post().to(paceline_auth::login))
                    .route("/logout", web::post().to(paceline_auth::logout))
                    .route("/me", web::get().to(paceline_auth::me))
                    .route("/change-password", web::post().to(groups::change_password)),
            )
            .service(
                web::scope("/api/groups")
                    .route("", web::get().to(groups::index))
                    .route("", web::post().to(groups::create))
                    .route("/{id}", web::get().to(groups::show))
                    .route("/{id}", web::put().to(groups::update))
                    .route("/{id}", web::delete().to(groups::destroy))
                    .route("/{id}/reset-password", web::post().to(groups::reset_password))
                    .route("/{id}/members", web::get().to(members::index))
                    .route("/{id}/members", web::post().to(members::create))
                    .route("/{id}/members/{member_id}", web::put().to(members::update))
                    .route("/{id}/members/{member_id}", web::delete().to(members::destroy)),
            )
            .service(
                web::scope("/api/events")
                    .route("", web::get().to(events::index))
                    .route("", web::post().to(events::create))
                    .route("/secret-code/{code}", web::get().to(events::preview))
                    .route("/secret-code/{code}/members", web::get().to(events::joinable))
                    .route("/{id}", web::get().to(events::show))
                    .route("/{id}", web::put().to(events::update))
                    .route("/{id}", web::delete().to(events::destroy))
                    .route("/{id}/participants", web::post().to(events::enroll))
                    .route("/{id}/participants/bulk", web::post().to(events::enroll_bulk))
                    .route("/{id}/participants/{participant_id}", web::delete().to(events::withdraw)),
            )
            .route("/api/join-event", web::post().to(events::join))
    })
    .workers(6)
    .bind(std::env::var("BIND_ADDR").expect("BIND_ADDR must be set"))?
    .run()
    .await
}
