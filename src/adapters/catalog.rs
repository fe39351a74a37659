use crate::domain::model::{CandidateItems, TopicRecord, TopicSummary};
use crate::domain::ports::ItemSource;
use crate::utils::error::{BingoError, Result};
use async_trait::async_trait;
use std::path::Path;

/// Predefined topics loaded once from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    records: Vec<TopicRecord>,
}

impl StaticCatalog {
    pub fn new(records: Vec<TopicRecord>) -> Self {
        Self { records }
    }

    /// 從 JSON 檔案載入主題目錄
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let catalog = Self::from_json_str(&content)?;
        tracing::info!(
            "📚 Loaded {} topics from {}",
            catalog.records.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let records: Vec<TopicRecord> = serde_json::from_str(content)?;
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[TopicRecord] {
        &self.records
    }

    /// Exact, case-sensitive lookup.
    pub fn find(&self, topic: &str) -> Option<&TopicRecord> {
        self.records.iter().find(|record| record.topic == topic)
    }
}

#[async_trait]
impl ItemSource for StaticCatalog {
    async fn fetch_candidates(&self, topic: &str) -> Result<CandidateItems> {
        self.find(topic)
            .map(|record| record.items.clone())
            .ok_or_else(|| BingoError::TopicNotFound {
                topic: topic.to_string(),
            })
    }

    fn list_topics(&self) -> Vec<TopicSummary> {
        self.records
            .iter()
            .map(|record| TopicSummary {
                topic: record.topic.clone(),
                item_count: record.items.len(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"[
        {"topic": "Animals", "items": ["Lion", "Tiger", "Bear"]},
        {"topic": "Weather", "items": ["Rain", "Snow"]}
    ]"#;

    #[tokio::test]
    async fn test_fetch_known_topic() {
        let catalog = StaticCatalog::from_json_str(CATALOG).unwrap();
        let items = catalog.fetch_candidates("Animals").await.unwrap();
        assert_eq!(items, vec!["Lion", "Tiger", "Bear"]);
    }

    #[tokio::test]
    async fn test_unknown_topic_is_not_found() {
        let catalog = StaticCatalog::from_json_str(CATALOG).unwrap();
        let err = catalog.fetch_candidates("animals").await.unwrap_err();
        assert!(matches!(err, BingoError::TopicNotFound { topic } if topic == "animals"));
    }

    #[test]
    fn test_from_file_keeps_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = StaticCatalog::from_file(file.path()).unwrap();
        let names: Vec<&str> = catalog.records().iter().map(|r| r.topic.as_str()).collect();
        assert_eq!(names, vec!["Animals", "Weather"]);
    }

    #[test]
    fn test_list_topics_reports_item_counts() {
        let catalog = StaticCatalog::from_json_str(CATALOG).unwrap();
        let topics = catalog.list_topics();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].topic, "Animals");
        assert_eq!(topics[0].item_count, 3);
        assert_eq!(topics[1].item_count, 2);
    }

    #[test]
    fn test_malformed_catalog_is_serialization_error() {
        let err = StaticCatalog::from_json_str(r#"{"topic": "Animals"}"#).unwrap_err();
        assert!(matches!(err, BingoError::SerializationError(_)));
    }
}
