use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// 中央格顯示的文字
pub const FREE_SPACE: &str = "FREE SPACE";
pub const GRID_SIZE: usize = 5;
pub const CARD_CELLS: usize = GRID_SIZE * GRID_SIZE;
pub const CENTER_INDEX: usize = CARD_CELLS / 2;
/// 一張卡需要的題目數（扣掉中央格）
pub const MIN_POOL_ITEMS: usize = CARD_CELLS - 1;
pub const MAX_POOL_ITEMS: usize = 30;

/// Raw strings as returned by an item source, before validation.
pub type CandidateItems = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicSource {
    Predefined,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub source: TopicSource,
}

impl Topic {
    pub fn predefined(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: TopicSource::Predefined,
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: TopicSource::Custom,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.source == TopicSource::Custom
    }
}

/// One entry of the static topic catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRecord {
    pub topic: String,
    pub items: Vec<String>,
}

/// Catalog listing entry for the topic picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub topic: String,
    pub item_count: usize,
}

/// Validated draw source for one generation request.
///
/// Only [`crate::core::pool::build_pool`] constructs a pool, so every pool
/// holds between 24 and 30 non-blank items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CardPool {
    items: Vec<String>,
}

impl CardPool {
    pub(crate) fn from_validated(items: Vec<String>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<String> {
        self.items
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Free,
    /// `pool_index` is the slot of the pool the text was drawn from.
    Item { text: String, pool_index: usize },
}

impl Cell {
    pub fn text(&self) -> &str {
        match self {
            Cell::Free => FREE_SPACE,
            Cell::Item { text, .. } => text,
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Cell::Free)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.text())
    }
}

/// One 5x5 card, row-major, free space at [`CENTER_INDEX`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CardLayout {
    cells: Vec<Cell>,
}

impl CardLayout {
    pub(crate) fn from_cells(cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), CARD_CELLS);
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(GRID_SIZE)
    }

    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(Cell::text).collect()
    }
}

impl fmt::Display for CardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<&str> = row.iter().map(Cell::text).collect();
            writeln!(f, "{}", line.join(" | "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: Topic,
    pub card_count: usize,
    /// Fixed seed for reproducible cards; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl GenerationRequest {
    pub fn new(topic: Topic, card_count: usize) -> Self {
        Self {
            topic,
            card_count,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        assert_eq!(CARD_CELLS, 25);
        assert_eq!(CENTER_INDEX, 12);
        assert_eq!(MIN_POOL_ITEMS, 24);
    }

    #[test]
    fn test_cell_serializes_as_plain_text() {
        let cells = vec![
            Cell::Item {
                text: "Lion".to_string(),
                pool_index: 3,
            },
            Cell::Free,
        ];
        let json = serde_json::to_value(&cells).unwrap();
        assert_eq!(json, serde_json::json!(["Lion", "FREE SPACE"]));
    }

    #[test]
    fn test_topic_source_serde() {
        let topic: Topic =
            serde_json::from_str(r#"{"name":"Space","source":"custom"}"#).unwrap();
        assert!(topic.is_custom());
    }
}
