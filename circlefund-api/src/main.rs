use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use circlefund_api::config::ApiConfig;
use circlefund_api::handlers;
use circlefund_api::helpers::auth_context::{EMAIL_HEADER, PASSWORD_HEADER};
use circlefund_api::helpers::logging::init_tracing;
use circlefund_api::integrations::UpstreamClient;
use circlefund_api::jobs::{ReportManager, ReportTimings};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    }))
}

#[get("/settings")]
async fn get_settings(data: web::Data<handlers::settings::SettingsAppState>) -> impl Responder {
    handlers::settings::get_settings(data).await
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,

    /// Config file to use instead of the per-user default
    #[arg(long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    init_tracing(args.log_file_path.as_deref());

    let loaded = match &args.config {
        Some(path) => ApiConfig::load_from(path),
        None => ApiConfig::load(),
    };
    let (config, config_path) =
        loaded.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

    tracing::info!("Config loaded from {:?}", config_path);

    let settings_state = handlers::settings::SettingsAppState {
        config: Arc::new(std::sync::RwLock::new(config.clone())),
        config_path,
    };

    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 8080)
    };

    let upstream = UpstreamClient::new(&config.upstream)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    tracing::info!("Reading member data from {}", upstream.base_url());

    let report_manager = Arc::new(ReportManager::new(
        Arc::new(upstream),
        ReportTimings::from(&config.upstream),
    ));

    tracing::info!("Server will listen on {}:{}", host, port);

    let report_manager_for_server = report_manager.clone();
    let server = HttpServer::new(move || {
        let allowed_headers = vec![
            "Authorization",
            "Accept",
            "Content-Type",
            EMAIL_HEADER,
            PASSWORD_HEADER,
        ];
        let cors = if let Some(cors_config) = &config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(allowed_headers)
                .expose_headers(vec!["Content-Disposition"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(allowed_headers)
                .expose_headers(vec!["Content-Disposition"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(settings_state.clone()))
            .app_data(web::Data::new(report_manager_for_server.clone()))
            .service(health)
            .service(get_settings)
            .route("/api/reports/general", web::get().to(handlers::reports::get_general_report))
            .route("/api/reports/general", web::delete().to(handlers::reports::abandon_general_report))
            .route("/api/reports/general/export", web::get().to(handlers::reports::export_general_report))
            .route("/api/reports/general/refresh", web::post().to(handlers::reports::refresh_general_report))
            .route("/api/reports/general/status", web::get().to(handlers::reports::report_status))
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();
    let shutdown_manager = report_manager.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        shutdown_manager.abandon();

        handle.stop(true).await;
    });

    server.await
}
