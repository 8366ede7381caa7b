use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;

mod channels;
mod config;
mod controllers;
mod db;
mod feed;
mod handlers;
mod models;
mod scheduler;

use channels::{ChannelRouter, TwilioSender};
use config::Config;
use db::Database;
use feed::FeedClient;
use handlers::SubscriptionService;
use scheduler::AlertScheduler;

pub struct AppState {
    pub db: Arc<Database>,
    pub subscriptions: Arc<SubscriptionService>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Arc::new(Database::new(&config.database_url).expect("Failed to initialize database"));

    let subscriptions = Arc::new(SubscriptionService::new(db.clone()));

    // The dispatch loop only runs when the provider can actually send;
    // keep the sender half alive or the loop sees an immediate shutdown.
    let _scheduler_shutdown_tx = match (
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
    ) {
        (Some(account_sid), Some(auth_token)) => {
            let router = ChannelRouter::new(
                &config.preferred_channel,
                config.twilio_sms_from.clone(),
                config.twilio_whatsapp_from.clone(),
            );
            let sender = Arc::new(TwilioSender::new(account_sid, auth_token));
            let feed = FeedClient::new(config.feed_url.clone());
            let alert_scheduler = AlertScheduler::new(
                db.clone(),
                feed,
                router,
                sender,
                Duration::from_secs(config.poll_interval_seconds),
                config.relay_all_alerts,
            );

            let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
            tokio::spawn(async move {
                alert_scheduler.start(shutdown_rx).await;
            });
            Some(shutdown_tx)
        }
        _ => {
            log::warn!("Twilio credentials not configured; alert dispatch disabled");
            None
        }
    };

    log::info!("Starting HealthBot server on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                subscriptions: Arc::clone(&subscriptions),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::subscriptions::config)
            .configure(controllers::dashboard::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
