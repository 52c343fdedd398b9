use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod alerts;
mod api;
mod cli;
mod config;
mod db;
mod scheduler;
mod shutdown;

use crate::api::{
    alert::{AlertService, handlers::alert_config},
    analytics::{AnalyticsService, handlers::analytics_config},
    health::health_config,
    job::{JobService, handlers::job_config},
    machine::{MachineService, handlers::machine_config},
    schedule::{ScheduleService, handlers::schedule_config},
    validation,
};
use crate::scheduler::EngineGate;
use crate::shutdown::ShutdownCoordinator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = cli::Cli::parse();

    // Load configuration from environment
    let config::Config {
        database_url,
        bind_addr,
        port,
        max_payload_size,
        max_db_connections,
        log_dir,
    } = config::Config::from_env().expect("Failed to load configuration");

    // Create logs directory if it doesn't exist
    std::fs::create_dir_all(&log_dir).expect("Failed to create logs directory");

    // Initialize file-based logging with daily rotation and level separation
    // Log files will be created as: logs/info.2024-12-22.log, logs/error.2024-12-22.log, etc.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    // Create daily rotating file appenders for each log level
    let info_file = tracing_appender::rolling::daily(&log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(&log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(&log_dir, "error.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    // Console layer for terminal output
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .init();

    // Get database connection pool
    let pool = db::connection::get_connection(&database_url, max_db_connections)
        .await
        .expect("Failed to connect to database");

    // Run migrations on startup
    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    if let Some(cli::Command::VerifyDb) = args.command {
        let result = db::verify::run(&pool).await;
        pool.close().await;
        return result.map_err(|e| std::io::Error::other(format!("verify-db failed: {}", e)));
    }

    info!("Starting printshop-manager application");
    info!("Configuration loaded successfully:");
    info!("  - Bind address: {}:{}", bind_addr, port);
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Max database connections: {}", max_db_connections);
    info!("Database connection pool established");

    // The engine gate serializes auto-schedule and alert-check runs. It is
    // created once and shared across all HTTP workers.
    let engine_gate = web::Data::new(EngineGate::new());

    // Clone pool for HTTP server (original will be used for shutdown)
    let server_pool = pool.clone();

    let server = HttpServer::new(move || {
        let job_service = web::Data::new(JobService::new(server_pool.clone()));
        let machine_service = web::Data::new(MachineService::new(server_pool.clone()));
        let schedule_service = web::Data::new(ScheduleService::new(server_pool.clone()));
        let alert_service = web::Data::new(AlertService::new(server_pool.clone()));
        let analytics_service = web::Data::new(AnalyticsService::new(server_pool.clone()));

        // Configure payload size limits globally
        let payload_config = web::PayloadConfig::default().limit(max_payload_size);

        App::new()
            .app_data(web::Data::new(server_pool.clone())) // Share DB pool across workers
            .app_data(job_service)
            .app_data(machine_service)
            .app_data(schedule_service)
            .app_data(alert_service)
            .app_data(analytics_service)
            .app_data(engine_gate.clone())
            .app_data(payload_config)
            .app_data(validation::json_config()) // Global validation config
            .configure(health_config)
            .service(
                web::scope("/api")
                    .configure(job_config)
                    .configure(machine_config)
                    .configure(schedule_config)
                    .configure(analytics_config)
                    .configure(alert_config),
            )
    });

    info!("Server starting on http://{}:{}", bind_addr, port);

    let server = server.bind((bind_addr.as_str(), port))?.run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn server in background
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, pool);
    coordinator.wait_for_shutdown().await
}
