use std::ops::ControlFlow;

use crate::domain::{Article, DeliveryRecord, Notification};
use crate::errors::RelayResult;
use crate::services::notification_service::Notifier;
use crate::sources::FeedSource;
use crate::storage::{DeliveryStore, InsertOutcome};

/// What a poll cycle does when it meets an article that was already delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The feed is newest-first, so everything after a seen item was seen too:
    /// end the cycle right there.
    #[default]
    StopBatch,
    /// Ignore the seen item and keep scanning the rest of the feed.
    SkipAndContinue,
}

impl DuplicatePolicy {
    fn on_seen(self) -> ControlFlow<()> {
        match self {
            DuplicatePolicy::StopBatch => ControlFlow::Break(()),
            DuplicatePolicy::SkipAndContinue => ControlFlow::Continue(()),
        }
    }
}

/// Outcome of one poll cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub delivered: usize,
    pub skipped: usize,
    /// Guid of the seen article that ended the cycle early
    pub stopped_at: Option<String>,
}

pub struct PublishService<S: FeedSource, N: Notifier, D: DeliveryStore> {
    source: S,
    notifier: N,
    store: D,
    policy: DuplicatePolicy,
}

impl<S: FeedSource, N: Notifier, D: DeliveryStore> PublishService<S, N, D> {
    pub fn new(source: S, notifier: N, store: D) -> Self {
        Self {
            source,
            notifier,
            store,
            policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    /// Fetch the feed, deliver every article not yet recorded, record it.
    ///
    /// Errors from the feed, the notifier or the store end the cycle; articles
    /// delivered before the error stay recorded and the failing one is retried
    /// next cycle.
    pub async fn run_poll_cycle(&self) -> RelayResult<CycleReport> {
        let articles = self.source.fetch_articles().await?;

        let mut report = CycleReport {
            fetched: articles.len(),
            ..CycleReport::default()
        };

        for article in &articles {
            if self.store.exists(&article.guid)? {
                match self.policy.on_seen() {
                    ControlFlow::Break(()) => {
                        report.stopped_at = Some(article.guid.clone());
                        break;
                    }
                    ControlFlow::Continue(()) => {
                        report.skipped += 1;
                        continue;
                    }
                }
            }

            self.publish(article).await?;
            report.delivered += 1;
        }

        Ok(report)
    }

    async fn publish(&self, article: &Article) -> RelayResult<()> {
        let record = DeliveryRecord::from_article(article);
        if record.pub_date.is_none() {
            if let Some(raw) = &article.pub_date {
                tracing::warn!(guid = %article.guid, pub_date = %raw, "unparseable pubDate, storing null");
            }
        }

        tracing::info!("new article: {}", article.title);
        let notification = Notification::from_article(article);
        self.notifier.deliver(&notification.format()).await?;

        if self.store.insert(&record)? == InsertOutcome::Duplicate {
            tracing::debug!(guid = %record.guid, "already recorded by another cycle");
        }

        Ok(())
    }
}
