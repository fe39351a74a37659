use crate::domain::model::{CardLayout, CardPool, Cell, CARD_CELLS, CENTER_INDEX, MIN_POOL_ITEMS};
use crate::utils::error::{BingoError, Result};
use rand::Rng;

/// Uniform random permutation of `0..len` (Fisher-Yates).
fn shuffled_indices<R: Rng>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    for i in (1..indices.len()).rev() {
        let j = rng.gen_range(0..=i);
        indices.swap(i, j);
    }
    indices
}

/// Build one card from `pool`.
///
/// The whole pool is shuffled, the first 24 slots fill the card in row-major
/// order around the free space, and the rest is discarded for this card.
pub fn generate_card<R: Rng>(pool: &CardPool, rng: &mut R) -> Result<CardLayout> {
    if pool.len() < MIN_POOL_ITEMS {
        return Err(BingoError::InsufficientItems {
            count: pool.len(),
            items: pool.items().to_vec(),
        });
    }

    let order = shuffled_indices(pool.len(), rng);
    let selected = &order[..MIN_POOL_ITEMS];

    let cells = (0..CARD_CELLS)
        .map(|position| {
            if position == CENTER_INDEX {
                return Cell::Free;
            }
            let slot = if position < CENTER_INDEX {
                selected[position]
            } else {
                selected[position - 1]
            };
            Cell::Item {
                text: pool.items()[slot].clone(),
                pool_index: slot,
            }
        })
        .collect();

    Ok(CardLayout::from_cells(cells))
}

/// Build `count` independent cards. Cards may share items or even be equal.
pub fn generate_cards<R: Rng>(
    pool: &CardPool,
    count: usize,
    rng: &mut R,
) -> Result<Vec<CardLayout>> {
    (0..count).map(|_| generate_card(pool, rng)).collect()
}
