#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use feed_relay::domain::Article;
use feed_relay::errors::{RelayError, RelayResult};
use feed_relay::services::Notifier;
use feed_relay::sources::FeedSource;

pub fn article(guid: &str) -> Article {
    Article::new(guid, format!("Title {}", guid), format!("https://beteve.cat/{}", guid))
        .with_pub_date(Some("Mon, 01 Jan 2024 00:00:00 GMT".to_string()))
}

/// Feed double whose contents can be swapped between cycles
#[derive(Clone, Default)]
pub struct ScriptedSource {
    articles: Arc<Mutex<Vec<Article>>>,
    fetches: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(articles: Vec<Article>) -> Self {
        let source = Self::default();
        source.set_articles(articles);
        source
    }

    pub fn set_articles(&self, articles: Vec<Article>) {
        *self.articles.lock().unwrap() = articles;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for ScriptedSource {
    async fn fetch_articles(&self) -> RelayResult<Vec<Article>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.articles.lock().unwrap().clone())
    }
}

/// Feed double that blocks every fetch until the test opens the gate
#[derive(Clone)]
pub struct GatedSource {
    inner: ScriptedSource,
    gate: Arc<Semaphore>,
}

impl GatedSource {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            inner: ScriptedSource::new(articles),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    pub fn open(&self) {
        self.gate.add_permits(1);
    }

    pub fn fetch_count(&self) -> usize {
        self.inner.fetch_count()
    }
}

#[async_trait]
impl FeedSource for GatedSource {
    async fn fetch_articles(&self) -> RelayResult<Vec<Article>> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| RelayError::FeedParse(e.to_string()))?;
        permit.forget();
        Ok(self.inner.articles.lock().unwrap().clone())
    }
}

/// Notifier double recording every message; can be told to fail for a title
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
    failing_titles: Arc<Mutex<HashSet<String>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_for(&self, title: &str) {
        self.failing_titles.lock().unwrap().insert(title.to_string());
    }

    pub fn recover(&self) {
        self.failing_titles.lock().unwrap().clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, message: &str) -> RelayResult<()> {
        let title = message.lines().next().unwrap_or_default();
        if self.failing_titles.lock().unwrap().contains(title) {
            return Err(RelayError::Notification(format!(
                "Telegram API error 502: Bad Gateway ({})",
                title
            )));
        }

        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}
