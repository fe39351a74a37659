use crate::domain::model::{CandidateItems, CardPool, MAX_POOL_ITEMS, MIN_POOL_ITEMS};
use crate::utils::error::{BingoError, Result};

/// Validate raw candidates into a [`CardPool`].
///
/// Blank entries are dropped, the rest is cut to 30 and must hold at least 24
/// items. Entries are kept verbatim and duplicates are not removed.
pub fn build_pool(candidates: &[String]) -> Result<CardPool> {
    let items: CandidateItems = candidates
        .iter()
        .filter(|item| !item.trim().is_empty())
        .take(MAX_POOL_ITEMS)
        .cloned()
        .collect();

    if items.len() < MIN_POOL_ITEMS {
        tracing::debug!(
            "Pool rejected: {} usable items out of {} candidates",
            items.len(),
            candidates.len()
        );
        return Err(BingoError::InsufficientItems {
            count: items.len(),
            items,
        });
    }

    Ok(CardPool::from_validated(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Item {}", i)).collect()
    }

    #[test]
    fn test_exactly_24_items_is_enough() {
        let pool = build_pool(&numbered(24)).unwrap();
        assert_eq!(pool.len(), 24);
    }

    #[test]
    fn test_23_items_is_rejected_with_count() {
        match build_pool(&numbered(23)) {
            Err(BingoError::InsufficientItems { count, items }) => {
                assert_eq!(count, 23);
                assert_eq!(items.len(), 23);
            }
            other => panic!("expected InsufficientItems, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_entries_do_not_count() {
        let mut candidates = numbered(23);
        candidates.push(String::new());
        candidates.push("   ".to_string());
        candidates.push("\t\n".to_string());

        match build_pool(&candidates) {
            Err(BingoError::InsufficientItems { count, .. }) => assert_eq!(count, 23),
            other => panic!("expected InsufficientItems, got {:?}", other),
        }
    }

    #[test]
    fn test_truncates_to_30_after_filtering() {
        let mut candidates = vec!["".to_string(), " ".to_string()];
        candidates.extend(numbered(35));

        let pool = build_pool(&candidates).unwrap();
        assert_eq!(pool.len(), 30);
        assert_eq!(pool.items()[0], "Item 1");
        assert_eq!(pool.items()[29], "Item 30");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut candidates = numbered(22);
        candidates.push("Item 1".to_string());
        candidates.push("Item 1".to_string());

        let pool = build_pool(&candidates).unwrap();
        assert_eq!(pool.len(), 24);
        assert_eq!(pool.items().iter().filter(|s| *s == "Item 1").count(), 3);
    }

    #[test]
    fn test_items_are_not_trimmed() {
        let mut candidates = numbered(23);
        candidates.push("  Padded  ".to_string());

        let pool = build_pool(&candidates).unwrap();
        assert_eq!(pool.items()[23], "  Padded  ");
    }

    #[test]
    fn test_build_pool_is_idempotent() {
        let candidates = numbered(28);
        let first = build_pool(&candidates).unwrap();
        let second = build_pool(&candidates).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.items(), candidates.as_slice());
    }
}
