use std::collections::{BTreeSet, HashMap};

use crate::models::{ItemId, ScoredCandidate, UserId};

use super::RatingIndex;

/// Tuning for a single recommendation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendOptions {
    /// Minimum rating for a user to join the liked cohort
    pub like_threshold: f32,
    /// Maximum number of items returned
    pub top_n: usize,
    /// Drop the target item from the aggregated scores
    pub exclude_target: bool,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            like_threshold: 4.0,
            top_n: 10,
            exclude_target: true,
        }
    }
}

/// Ranks items liked by the users who liked a target item
///
/// Scores are plain sums of cohort ratings, so an item rated by many cohort
/// members outranks one rated equally well by few.
pub struct RecommendationEngine<'a> {
    index: &'a RatingIndex,
    options: RecommendOptions,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(index: &'a RatingIndex) -> Self {
        Self::with_options(index, RecommendOptions::default())
    }

    pub fn with_options(index: &'a RatingIndex, options: RecommendOptions) -> Self {
        Self { index, options }
    }

    /// Users who rated the target at or above the like threshold
    pub fn cohort(&self, target: ItemId) -> BTreeSet<UserId> {
        self.index.users_rating(target, self.options.like_threshold)
    }

    /// Top-N candidates with their scores, highest first
    ///
    /// Equal scores are ordered by ascending item id. An unknown target or
    /// an empty cohort yields an empty list.
    pub fn scored(&self, target: ItemId) -> Vec<ScoredCandidate> {
        let cohort = self.cohort(target);
        self.rank(target, &cohort)
    }

    /// Item ids of [`scored`](Self::scored)
    pub fn recommend(&self, target: ItemId) -> Vec<ItemId> {
        self.scored(target).into_iter().map(|c| c.item_id).collect()
    }

    pub(crate) fn rank(&self, target: ItemId, cohort: &BTreeSet<UserId>) -> Vec<ScoredCandidate> {
        let mut scores: HashMap<ItemId, f64> = HashMap::new();
        for user_id in cohort {
            for (item_id, rating) in self.index.rated_items(*user_id) {
                if self.options.exclude_target && *item_id == target {
                    continue;
                }
                *scores.entry(*item_id).or_insert(0.0) += f64::from(*rating);
            }
        }

        let mut ranked: Vec<ScoredCandidate> = scores
            .into_iter()
            .map(|(item_id, score)| ScoredCandidate { item_id, score })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        ranked.truncate(self.options.top_n);

        tracing::debug!(
            target_item = target,
            cohort = cohort.len(),
            returned = ranked.len(),
            "Ranked recommendations"
        );
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RatingObservation;

    fn index(rows: &[(UserId, ItemId, f32)]) -> RatingIndex {
        RatingIndex::build(rows.iter().copied().map(RatingObservation::from))
    }

    #[test]
    fn test_two_user_scenario() {
        let idx = index(&[(1, 100, 5.0), (1, 200, 4.0), (2, 100, 5.0), (2, 300, 3.0)]);
        let engine = RecommendationEngine::new(&idx);

        assert_eq!(engine.cohort(100).into_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(
            engine.scored(100),
            vec![
                ScoredCandidate { item_id: 200, score: 4.0 },
                ScoredCandidate { item_id: 300, score: 3.0 },
            ]
        );
        assert_eq!(engine.recommend(100), vec![200, 300]);
    }

    #[test]
    fn test_unknown_target_is_empty() {
        let idx = index(&[(1, 100, 5.0), (1, 200, 4.0)]);
        assert!(RecommendationEngine::new(&idx).recommend(999).is_empty());
    }

    #[test]
    fn test_no_liked_cohort_is_empty() {
        let idx = index(&[(1, 100, 3.5), (1, 200, 5.0)]);
        assert!(RecommendationEngine::new(&idx).recommend(100).is_empty());
    }

    #[test]
    fn test_target_never_recommended() {
        let idx = index(&[(1, 100, 5.0), (1, 200, 1.0), (2, 100, 4.5)]);
        let recs = RecommendationEngine::new(&idx).recommend(100);
        assert_eq!(recs, vec![200]);
    }

    #[test]
    fn test_target_kept_when_not_excluded() {
        let idx = index(&[(1, 100, 5.0), (1, 200, 1.0), (2, 100, 4.5)]);
        let options = RecommendOptions {
            exclude_target: false,
            ..RecommendOptions::default()
        };
        let recs = RecommendationEngine::with_options(&idx, options).scored(100);
        assert_eq!(recs[0], ScoredCandidate { item_id: 100, score: 9.5 });
    }

    #[test]
    fn test_sum_favours_items_rated_by_more_users() {
        // 300 gets 3.0 + 3.0 from two users, 200 gets a single 5.0
        let idx = index(&[
            (1, 100, 5.0),
            (1, 200, 5.0),
            (1, 300, 3.0),
            (2, 100, 4.0),
            (2, 300, 3.0),
        ]);
        assert_eq!(RecommendationEngine::new(&idx).recommend(100), vec![300, 200]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let mut rows = vec![(1, 1, 5.0)];
        rows.extend((2..30).map(|item| (1, item, 3.0)));
        let idx = index(&rows);

        let recs = RecommendationEngine::new(&idx).recommend(1);
        assert_eq!(recs.len(), 10);

        let options = RecommendOptions {
            top_n: 3,
            ..RecommendOptions::default()
        };
        assert_eq!(
            RecommendationEngine::with_options(&idx, options).recommend(1),
            vec![2, 3, 4]
        );
    }

    #[test]
    fn test_ties_ordered_by_item_id_and_deterministic() {
        let idx = index(&[
            (1, 10, 5.0),
            (1, 40, 4.0),
            (1, 30, 4.0),
            (2, 10, 4.0),
            (2, 20, 4.0),
        ]);
        let engine = RecommendationEngine::new(&idx);
        let first = engine.recommend(10);
        assert_eq!(first, vec![20, 30, 40]);
        for _ in 0..5 {
            assert_eq!(engine.recommend(10), first);
        }
    }

    #[test]
    fn test_custom_like_threshold() {
        let idx = index(&[(1, 100, 3.0), (1, 200, 4.0), (2, 100, 5.0), (2, 300, 2.0)]);
        let options = RecommendOptions {
            like_threshold: 2.5,
            ..RecommendOptions::default()
        };
        let engine = RecommendationEngine::with_options(&idx, options);
        assert_eq!(engine.cohort(100).len(), 2);
        assert_eq!(engine.recommend(100), vec![200, 300]);
    }
}
