use url::Url;

use crate::errors::{RelayError, RelayResult};

pub const DEFAULT_FEED_URL: &str = "https://beteve.cat/feed/";
pub const DEFAULT_CHANNEL: &str = "@beteve_news";

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_api_key: String,
    pub feed_url: Url,
    pub telegram_channel: String,
    pub db_path: String,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> RelayResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        let db_path = std::env::var("DB_PATH").unwrap_or_else(|_| {
            exe_dir
                .map(|d| d.join("data.db").to_string_lossy().into_owned())
                .unwrap_or_else(|| "./data.db".to_string())
        });

        Self::from_vars(
            std::env::var("BOT_API_KEY").ok(),
            std::env::var("FEED_URL").ok(),
            std::env::var("TELEGRAM_CHANNEL").ok(),
            db_path,
        )
    }

    fn from_vars(
        bot_api_key: Option<String>,
        feed_url: Option<String>,
        telegram_channel: Option<String>,
        db_path: String,
    ) -> RelayResult<Self> {
        let bot_api_key = bot_api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RelayError::MissingEnvVar("BOT_API_KEY".to_string()))?;

        let feed_url = feed_url.unwrap_or_else(|| DEFAULT_FEED_URL.to_string());
        let feed_url = Url::parse(&feed_url).map_err(|e| RelayError::InvalidUrl(e.to_string()))?;
        if !matches!(feed_url.scheme(), "http" | "https") {
            return Err(RelayError::InvalidUrl(format!(
                "unsupported scheme: {}",
                feed_url.scheme()
            )));
        }

        let telegram_channel = telegram_channel
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());

        Ok(Self {
            bot_api_key,
            feed_url,
            telegram_channel,
            db_path,
        })
    }
}
