use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use crate::models::{ItemId, RatingObservation, UserId};

/// Sparse user -> (item -> rating) table
///
/// Built once from the full observation list and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RatingIndex {
    users: HashMap<UserId, HashMap<ItemId, f32>>,
}

impl RatingIndex {
    /// Builds the index, keeping the last rating seen for a repeated (user, item) pair
    pub fn build(observations: impl IntoIterator<Item = RatingObservation>) -> Self {
        let mut users: HashMap<UserId, HashMap<ItemId, f32>> = HashMap::new();
        for obs in observations {
            users
                .entry(obs.user_id)
                .or_default()
                .insert(obs.item_id, obs.rating);
        }
        Self { users }
    }

    /// Ratings recorded for a user; empty for an unknown user
    pub fn rated_items(&self, user_id: UserId) -> &HashMap<ItemId, f32> {
        static EMPTY: OnceLock<HashMap<ItemId, f32>> = OnceLock::new();
        self.users
            .get(&user_id)
            .unwrap_or_else(|| EMPTY.get_or_init(HashMap::new))
    }

    /// Users whose rating for `item_id` is at least `min_rating`
    pub fn users_rating(&self, item_id: ItemId, min_rating: f32) -> BTreeSet<UserId> {
        self.users
            .iter()
            .filter(|(_, items)| items.get(&item_id).is_some_and(|r| *r >= min_rating))
            .map(|(user_id, _)| *user_id)
            .collect()
    }

    pub fn users(&self) -> impl Iterator<Item = (UserId, &HashMap<ItemId, f32>)> {
        self.users.iter().map(|(user_id, items)| (*user_id, items))
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.users.contains_key(&user_id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of distinct (user, item) ratings held
    pub fn rating_count(&self) -> usize {
        self.users.values().map(HashMap::len).sum()
    }
}
