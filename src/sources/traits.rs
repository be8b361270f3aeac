use async_trait::async_trait;

use crate::domain::Article;
use crate::errors::RelayResult;

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the feed and return its items in document order (newest first)
    async fn fetch_articles(&self) -> RelayResult<Vec<Article>>;
}
