use crate::domain::model::{CandidateItems, TopicSummary};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Anything that can turn a topic name into raw candidate items.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_candidates(&self, topic: &str) -> Result<CandidateItems>;

    /// Topics this source can serve without a network call.
    fn list_topics(&self) -> Vec<TopicSummary> {
        Vec::new()
    }
}

/// Session-scoped key/value store for custom topic items.
pub trait SessionCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn catalog_path(&self) -> &str;
    fn upstream_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn request_timeout(&self) -> Duration;
    fn retry_on_transient(&self) -> bool;
    fn item_count(&self) -> usize;
    fn max_cards(&self) -> usize;
}
