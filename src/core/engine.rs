use crate::adapters::cache::{cache_key, DEFAULT_SESSION};
use crate::core::generator::generate_cards;
use crate::core::pool::build_pool;
use crate::domain::model::{
    CardLayout, CardPool, GenerationRequest, Topic, TopicSummary, MAX_POOL_ITEMS,
};
use crate::domain::ports::{ItemSource, SessionCache};
use crate::utils::error::{BingoError, ErrorCategory, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

pub const DEFAULT_MAX_CARDS: usize = 100;

/// Seeded RNG for reproducible requests, entropy otherwise.
pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Orchestrates fetch → validate → generate for one request at a time.
///
/// Every failure is logged here once and returned to the caller as a typed
/// error; nothing below this boundary logs at warn/error level.
pub struct BingoEngine {
    predefined: Arc<dyn ItemSource>,
    generated: Arc<dyn ItemSource>,
    cache: Arc<dyn SessionCache>,
    max_cards: usize,
}

impl BingoEngine {
    pub fn new(
        predefined: Arc<dyn ItemSource>,
        generated: Arc<dyn ItemSource>,
        cache: Arc<dyn SessionCache>,
    ) -> Self {
        Self {
            predefined,
            generated,
            cache,
            max_cards: DEFAULT_MAX_CARDS,
        }
    }

    pub fn with_max_cards(mut self, max_cards: usize) -> Self {
        self.max_cards = max_cards;
        self
    }

    pub fn max_cards(&self) -> usize {
        self.max_cards
    }

    pub fn topics(&self) -> Vec<TopicSummary> {
        self.predefined.list_topics()
    }

    fn source_for(&self, topic: &Topic) -> &dyn ItemSource {
        if topic.is_custom() {
            self.generated.as_ref()
        } else {
            self.predefined.as_ref()
        }
    }

    fn check_request(&self, request: &GenerationRequest) -> Result<()> {
        if request.topic.name.trim().is_empty() {
            return Err(BingoError::InvalidRequest {
                message: "Topic is required".to_string(),
            });
        }
        if request.card_count == 0 || request.card_count > self.max_cards {
            return Err(BingoError::InvalidRequest {
                message: format!(
                    "Card count must be between 1 and {}, got {}",
                    self.max_cards, request.card_count
                ),
            });
        }
        Ok(())
    }

    async fn fetch_pool(&self, topic: &Topic) -> Result<CardPool> {
        let candidates = self.source_for(topic).fetch_candidates(&topic.name).await?;
        tracing::debug!(
            "Fetched {} candidates for \"{}\" ({:?})",
            candidates.len(),
            topic.name,
            topic.source
        );
        let usable = candidates.iter().filter(|item| !item.trim().is_empty()).count();
        if !topic.is_custom() && usable > MAX_POOL_ITEMS {
            tracing::warn!(
                "✂️ Catalog topic \"{}\" has {} items, only the first {} are used",
                topic.name,
                usable,
                MAX_POOL_ITEMS
            );
        }
        build_pool(&candidates)
    }

    fn store_pool(&self, session: &str, topic: &str, pool: &CardPool) -> Result<()> {
        let value = serde_json::to_string(pool.items())?;
        self.cache.set(&cache_key(session, topic), value);
        Ok(())
    }

    fn load_pool(&self, session: &str, topic: &str) -> Result<CardPool> {
        let miss = || BingoError::StorageMiss {
            topic: topic.to_string(),
        };
        let stored = self.cache.get(&cache_key(session, topic)).ok_or_else(miss)?;
        let items: Vec<String> = serde_json::from_str(&stored).map_err(|e| {
            tracing::warn!("⚠️ Stored items for \"{}\" are unreadable: {}", topic, e);
            miss()
        })?;
        build_pool(&items)
    }

    /// Generate items for a custom topic and keep them for the session.
    pub async fn generate_items(&self, session: &str, topic: &str) -> Result<CardPool> {
        let result = self.generate_items_inner(session, topic.trim()).await;
        if let Err(e) = &result {
            log_failure("generate items", topic, e);
        }
        result
    }

    async fn generate_items_inner(&self, session: &str, topic: &str) -> Result<CardPool> {
        if topic.is_empty() {
            return Err(BingoError::InvalidRequest {
                message: "Topic is required".to_string(),
            });
        }

        tracing::info!("✨ Generating items for custom topic \"{}\"", topic);
        let pool = self.fetch_pool(&Topic::custom(topic)).await?;
        self.store_pool(session, topic, &pool)?;
        tracing::info!("✅ Stored {} items for \"{}\"", pool.len(), topic);
        Ok(pool)
    }

    /// Full fetch → validate → generate run using the request's seed.
    pub async fn run(&self, request: &GenerationRequest) -> Result<Vec<CardLayout>> {
        let mut rng = rng_for(request.seed);
        self.run_with_rng(DEFAULT_SESSION, request, &mut rng).await
    }

    pub async fn run_with_rng<R: Rng + Send>(
        &self,
        session: &str,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Result<Vec<CardLayout>> {
        let result = self.run_inner(session, request, rng).await;
        if let Err(e) = &result {
            log_failure("generate cards", &request.topic.name, e);
        }
        result
    }

    async fn run_inner<R: Rng + Send>(
        &self,
        session: &str,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Result<Vec<CardLayout>> {
        self.check_request(request)?;
        let topic = trimmed(&request.topic);

        let pool = self.fetch_pool(&topic).await?;
        if topic.is_custom() {
            self.store_pool(session, &topic.name, &pool)?;
        }

        let cards = generate_cards(&pool, request.card_count, rng)?;
        tracing::info!(
            "🎲 Generated {} cards for \"{}\" from {} items",
            cards.len(),
            topic.name,
            pool.len()
        );
        Ok(cards)
    }

    /// Cards for a topic already chosen in this session.
    ///
    /// Custom topics are served from the session cache only; a missing entry
    /// is a [`BingoError::StorageMiss`] and no upstream call is made.
    pub async fn cards_from_session<R: Rng + Send>(
        &self,
        session: &str,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Result<(CardPool, Vec<CardLayout>)> {
        let result = self.cards_from_session_inner(session, request, rng).await;
        if let Err(e) = &result {
            log_failure("load cards", &request.topic.name, e);
        }
        result
    }

    async fn cards_from_session_inner<R: Rng + Send>(
        &self,
        session: &str,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Result<(CardPool, Vec<CardLayout>)> {
        self.check_request(request)?;
        let topic = trimmed(&request.topic);

        let pool = if topic.is_custom() {
            self.load_pool(session, &topic.name)?
        } else {
            self.fetch_pool(&topic).await?
        };

        let cards = generate_cards(&pool, request.card_count, rng)?;
        tracing::info!("🎲 Generated {} cards for \"{}\"", cards.len(), topic.name);
        Ok((pool, cards))
    }
}

/// Topic names key both the catalog and the session cache, so every path
/// looks them up without surrounding whitespace.
fn trimmed(topic: &Topic) -> Topic {
    Topic {
        name: topic.name.trim().to_string(),
        source: topic.source,
    }
}

fn log_failure(operation: &str, topic: &str, error: &BingoError) {
    match (error.category(), error) {
        (ErrorCategory::Upstream, BingoError::Upstream { status, detail }) => {
            tracing::error!(
                status = ?status,
                detail = %detail,
                "❌ {} for \"{}\" failed: upstream error",
                operation,
                topic
            );
        }
        (ErrorCategory::Upstream, BingoError::InvalidResponseShape { detail }) => {
            tracing::error!(
                detail = %detail,
                "❌ {} for \"{}\" failed: invalid upstream payload",
                operation,
                topic
            );
        }
        (ErrorCategory::User, _) => {
            tracing::warn!("⚠️ {} for \"{}\" failed: {}", operation, topic, error);
            tracing::debug!("💡 Suggestion: {}", error.recovery_suggestion());
        }
        _ => {
            tracing::error!("❌ {} for \"{}\" failed: {}", operation, topic, error);
        }
    }
}
