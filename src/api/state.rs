use std::sync::Arc;

use crate::services::Recommender;

/// Shared application state
///
/// The recommender is fully built before the server starts and never
/// mutated afterwards, so handlers share it without a lock.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            recommender: Arc::new(recommender),
        }
    }
}
