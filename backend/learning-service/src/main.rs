use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use learning_service::clients::{ChromaClient, LlmProvider, OpenAiCompatibleProvider, VectorStore};
use learning_service::config::Config;
use learning_service::handlers::{self, HealthState};
use learning_service::middleware::AdminPolicy;
use learning_service::services::{
    AnalyticsService, ProgressService, QaService, QaSettings, VideoService,
};
use learning_service::{db, SERVICE_NAME};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    tracing::error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Learning Service
///
/// REST backend for lecture videos, transcript-grounded question answering
/// and watch-time analytics.
///
/// # Routes
///
/// - `/api/qa` - Ask a question about a video
/// - `/api/student-data/*` - Watch time and question tracking
/// - `/api/admin/student-progress` - Admin progress report
/// - `/api/videos/*` - Lecture video records
/// - `/api/health*`, `/metrics` - Probes and Prometheus metrics
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    tracing::info!(
        "Starting {} v{} ({})",
        SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
        config.app.env
    );

    crypto_core::jwt::initialize_jwt_secret(&config.auth.jwt_secret)
        .map_err(|e| startup_error("Failed to initialize JWT secret", e))?;

    let mut db_cfg = db_pool::DbConfig::from_env(SERVICE_NAME, &config.database.url)
        .map_err(|e| startup_error("Invalid database pool settings", e))?;
    config.database.apply_to(&mut db_cfg);
    db_cfg.log_config();

    let pool = db_pool::create_pool(db_cfg)
        .await
        .map_err(|e| startup_error("Failed to create database pool", e))?;

    db::run_migrations(&pool)
        .await
        .map_err(|e| startup_error("Failed to run migrations", e))?;

    let provider = OpenAiCompatibleProvider::new(&config.llm)
        .map_err(|e| startup_error("Failed to build LLM client", e))?;
    let llm_configured = provider.is_configured();
    if !llm_configured {
        tracing::warn!("No LLM API key configured; questions will fail with 502");
    }
    let llm: Arc<dyn LlmProvider> = Arc::new(provider);

    let vector_store: Option<Arc<dyn VectorStore>> = match &config.vector_store.url {
        Some(url) => {
            let client = ChromaClient::new(
                url,
                Duration::from_millis(config.vector_store.timeout_ms),
            )
            .map_err(|e| startup_error("Failed to build vector store client", e))?;
            tracing::info!("Vector store lookups enabled at {}", url);
            Some(Arc::new(client) as Arc<dyn VectorStore>)
        }
        None => {
            tracing::info!("Vector store disabled; answers use full transcripts");
            None
        }
    };

    let qa_service = web::Data::new(QaService::new(
        llm,
        vector_store,
        QaSettings::from(&config.vector_store),
    ));
    let progress_service = web::Data::new(ProgressService::new(
        pool.clone(),
        config.progress.completion_ratio,
    ));
    let video_service = web::Data::new(VideoService::new(pool.clone()));
    let analytics_service = web::Data::new(AnalyticsService::new(pool.clone()));
    let admin_policy = web::Data::new(AdminPolicy::new(config.auth.admin_usernames.clone()));
    let health_state = web::Data::new(HealthState { llm_configured });
    let pool_data = web::Data::new(pool.clone());

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Learning service listening on http://{}", bind_address);

    let cors_config = config.cors.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_config.origins() {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(pool_data.clone())
            .app_data(qa_service.clone())
            .app_data(progress_service.clone())
            .app_data(video_service.clone())
            .app_data(analytics_service.clone())
            .app_data(admin_policy.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let server_result = tokio::select! {
        result = &mut server_task => result,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            server_task.await
        }
    };

    match server_result {
        Ok(result) => result?,
        Err(e) => return Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
    }

    pool.close().await;
    tracing::info!("Learning service stopped");
    Ok(())
}
