use feed_relay::config::Config;
use feed_relay::errors::RelayResult;
use feed_relay::scheduler::Scheduler;
use feed_relay::services::{PublishService, TelegramNotifier};
use feed_relay::sources::RssSource;
use feed_relay::storage::{SqliteDeliveryRepository, SqliteStorage};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> RelayResult<()> {
    // Load configuration before touching the store or the network
    let config = Config::from_env()?;

    // Initialize storage
    let storage = SqliteStorage::new(&config.db_path)?;
    let store = SqliteDeliveryRepository::new(storage);

    let source = RssSource::new(config.feed_url.clone());
    let notifier = TelegramNotifier::new(&config)?;

    tracing::info!(
        feed = %config.feed_url,
        channel = %config.telegram_channel,
        db = %config.db_path,
        "relay started"
    );

    let service = PublishService::new(source, notifier, store);
    Scheduler::new(service)
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}
