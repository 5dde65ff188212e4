//! src/startup.rs
use crate::configuration::Settings;
use crate::domain::EmailValidator;
use crate::routes::{
    health_check, json_error_handler, list_subscriptions, subscribe, subscribe_preflight,
};
use crate::storage::{build_store, SubscriptionStore};
use actix_web::dev::Server;
use actix_web::http::{header, Method};
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub async fn build(config: Settings) -> Result<Application, anyhow::Error> {
    let address = format!("{}:{}", config.application.host, config.application.port);
    let tcp_listener =
        TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
    let port = tcp_listener.local_addr()?.port();

    let validator = config
        .validation
        .validator()
        .context("Invalid validation settings")?;
    let store = build_store(&config.storage, &config.database).await?;

    tracing::info!(
        port,
        backend = ?config.storage.backend,
        allowed_domains = validator.allowed_domains().len(),
        "Starting subscription service"
    );

    let server = run(tcp_listener, validator, store)?;

    Ok(Application { port, server })
}

pub fn run(
    listener: TcpListener,
    validator: EmailValidator,
    store: Arc<dyn SubscriptionStore>,
) -> Result<Server, std::io::Error> {
    let validator = web::Data::new(validator);
    let store: web::Data<dyn SubscriptionStore> = web::Data::from(store);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/health_check", web::get().to(health_check))
            .route("/subscribe", web::post().to(subscribe))
            .route(
                "/subscribe",
                web::method(Method::OPTIONS).to(subscribe_preflight),
            )
            .route("/list", web::get().to(list_subscriptions))
            .app_data(validator.clone())
            .app_data(store.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Any origin may call the API.
fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
}
