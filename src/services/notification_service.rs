use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use telegram::{ChatId, TelegramClient};

use crate::config::Config;
use crate::errors::RelayResult;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message to the configured destination
    async fn deliver(&self, message: &str) -> RelayResult<()>;
}

/// Randomized pause taken before every send so a burst of new articles
/// doesn't hit the chat API back to back
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    min: Duration,
    max: Duration,
}

impl Pacing {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn next_delay(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(min..=max))
    }

    pub async fn wait(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(Duration::from_millis(200), Duration::from_millis(300))
    }
}

pub struct TelegramNotifier {
    client: TelegramClient,
    chat_id: ChatId,
    pacing: Pacing,
}

impl TelegramNotifier {
    pub fn new(config: &Config) -> RelayResult<Self> {
        let client = TelegramClient::new(&config.bot_api_key)?;
        let chat_id: ChatId = config
            .telegram_channel
            .parse()
            .unwrap_or_else(|never| match never {});

        Ok(Self {
            client,
            chat_id,
            pacing: Pacing::default(),
        })
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn deliver(&self, message: &str) -> RelayResult<()> {
        self.pacing.wait().await;

        let sent = self.client.send_message(&self.chat_id, message).await?;
        tracing::debug!(message_id = sent.message_id, chat = %self.chat_id, "message delivered");
        Ok(())
    }
}
