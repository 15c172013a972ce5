//! # Auditory Status Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, starts
//! calendar sync and the health server, and runs the Telegram dispatcher.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auditory_status_bot::bot::handlers::{BotContext, BotHandler};
use auditory_status_bot::bot::session::SessionStore;
use auditory_status_bot::config::Config;
use auditory_status_bot::database::connection::DatabaseManager;
use auditory_status_bot::services::calendar::GoogleCalendarClient;
use auditory_status_bot::services::calendar_sync::{CalendarSync, CalendarSyncService};
use auditory_status_bot::services::health::HealthService;
use auditory_status_bot::services::notifier::TelegramNotifier;
use auditory_status_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("auditory_status_bot={},tower_http=info", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Auditory Status Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - HTTP Port: {}, broadcast: {}, calendar: {}",
        config.http_port,
        config
            .broadcast_target()
            .map_or("disabled".to_string(), |t| format!("chat {} topic {:?}", t.chat_id, t.topic_id)),
        config.google_calendar_id
    );

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    // Initialize bot
    let bot = Bot::new(&config.telegram_bot_token);
    let notifier = Arc::new(TelegramNotifier::new(bot.clone(), config.broadcast_target()));
    let handler = BotHandler::new(BotContext {
        db: db_arc.clone(),
        sessions: SessionStore::new(),
        notifier,
    });

    // Calendar sync only runs with an access token
    let calendar_sync = config.google_api_token.as_ref().map(|token| {
        let client = GoogleCalendarClient::new(config.google_calendar_id.clone(), token.clone());
        Arc::new(CalendarSync::new(db_arc.clone(), Arc::new(client), config.sync_window_days))
    });

    let mut sync_service = match &calendar_sync {
        Some(sync) => {
            let mut service = CalendarSyncService::new(sync.clone(), config.sync_interval())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create calendar sync service: {}", e))?;
            if let Err(e) = service.start().await {
                tracing::error!("Failed to start calendar sync service: {}", e);
            }
            Some(service)
        }
        None => {
            log_system_event("Calendar sync disabled", Some("GOOGLE_API_TOKEN is not set"));
            None
        }
    };

    // Initialize health service
    let health_service = HealthService::new(db_arc.clone(), calendar_sync);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Some(service) = sync_service.as_mut() {
        if let Err(e) = service.stop().await {
            tracing::warn!("Error stopping calendar sync service: {}", e);
        }
    }

    db_arc.close().await;
    info!("Application stopped");
    Ok(())
}
