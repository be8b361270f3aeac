//! Telegram Bot API bindings for Rust
//! Provides just enough of the Bot API to post text messages to a chat or channel

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://api.telegram.org";

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Bot token is empty")]
    InvalidToken,
    #[error("Telegram API error {code}: {description}")]
    Api { code: i32, description: String },
    #[error("Rate limited, retry after {0}s")]
    RateLimited(u64),
}

/// Destination of a message: a numeric chat id or a public `@channel` name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl FromStr for ChatId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(id) => Ok(ChatId::Id(id)),
            Err(_) if s.starts_with('@') => Ok(ChatId::Username(s.to_string())),
            Err(_) => Ok(ChatId::Username(format!("@{}", s))),
        }
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Id(id) => write!(f, "{}", id),
            ChatId::Username(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i32>,
    parameters: Option<ResponseParameters>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, TelegramError> {
        if let Some(retry_after) = self.parameters.and_then(|p| p.retry_after) {
            return Err(TelegramError::RateLimited(retry_after));
        }

        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TelegramError::Api {
                code: self.error_code.unwrap_or_default(),
                description: self
                    .description
                    .unwrap_or_else(|| "missing result".to_string()),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a ChatId,
    text: &'a str,
}

pub struct TelegramClient {
    base_url: String,
    token: String,
    client: Client,
}

impl TelegramClient {
    pub fn new(token: &str) -> Result<Self, TelegramError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TelegramError::InvalidToken);
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: token.to_string(),
            client,
        })
    }

    /// Point the client at a different Bot API server (self-hosted or test)
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Send a plain text message to a chat
    pub async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<Message, TelegramError> {
        let payload = SendMessagePayload { chat_id, text };

        // Error statuses still carry a JSON body describing the failure
        let response: ApiResponse<Message> = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;

        response.into_result()
    }
}
