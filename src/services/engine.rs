use std::collections::HashMap;
use std::time::Instant;

use tracing::instrument;

use crate::{
    error::AppResult,
    models::{
        Catalog, CatalogEntry, ItemId, RatingObservation, Recommendation, RecommendationSet,
        TitleMatch, UserId, UserSignature,
    },
};

use super::{
    dataset::DatasetSource,
    recommendations::{RecommendOptions, RecommendationEngine},
    signatures::{estimate_jaccard, SignatureGenerator},
    title_resolver::{TitleResolver, DEFAULT_MATCH_THRESHOLD},
    RatingIndex,
};

/// Tuning shared by every query against a built [`Recommender`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub like_threshold: f32,
    pub top_n: usize,
    pub hash_functions: usize,
    pub signature_seed: u64,
    pub match_threshold: u8,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let options = RecommendOptions::default();
        Self {
            like_threshold: options.like_threshold,
            top_n: options.top_n,
            hash_functions: 10,
            signature_seed: 5,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl EngineSettings {
    fn recommend_options(&self) -> RecommendOptions {
        RecommendOptions {
            like_threshold: self.like_threshold,
            top_n: self.top_n,
            exclude_target: true,
        }
    }
}

/// The built dataset and everything derived from it
///
/// Construction is the only phase that does work over the whole dataset;
/// afterwards every method takes `&self`, so one instance can be shared
/// behind an `Arc` by any number of readers.
pub struct Recommender {
    index: RatingIndex,
    catalog: Catalog,
    signatures: HashMap<UserId, UserSignature>,
    settings: EngineSettings,
}

impl Recommender {
    pub fn build(
        observations: impl IntoIterator<Item = RatingObservation>,
        catalog: impl IntoIterator<Item = CatalogEntry>,
        settings: EngineSettings,
    ) -> Self {
        let start = Instant::now();

        let index = RatingIndex::build(observations);
        let catalog = Catalog::new(catalog);
        tracing::info!(
            users = index.user_count(),
            ratings = index.rating_count(),
            movies = catalog.len(),
            "Rating index built"
        );

        let signatures =
            SignatureGenerator::new(settings.hash_functions, settings.signature_seed).generate(&index);

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis(),
            "Recommender ready"
        );

        Self {
            index,
            catalog,
            signatures,
            settings,
        }
    }

    /// Loads both tables from `source` and builds
    pub fn from_source(source: &dyn DatasetSource, settings: EngineSettings) -> AppResult<Self> {
        tracing::info!(source = source.name(), "Loading dataset");
        let ratings = source.load_ratings()?;
        let catalog = source.load_catalog()?;
        Ok(Self::build(ratings, catalog, settings))
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn index(&self) -> &RatingIndex {
        &self.index
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Best catalog match for a free-text title
    pub fn resolve(&self, query: &str) -> Option<TitleMatch> {
        TitleResolver::with_threshold(&self.catalog, self.settings.match_threshold).resolve(query)
    }

    /// Recommendations for a raw item id; empty for unknown items
    pub fn recommend_for_item(&self, item_id: ItemId) -> Vec<Recommendation> {
        let engine = RecommendationEngine::with_options(&self.index, self.settings.recommend_options());
        engine
            .scored(item_id)
            .into_iter()
            .map(|c| self.describe(c.item_id, c.score))
            .collect()
    }

    /// Resolves `query` and recommends for the matched movie
    ///
    /// `None` means the title could not be resolved; a resolved movie nobody
    /// liked gives a set with no recommendations.
    #[instrument(skip(self))]
    pub fn recommend_for_title(&self, query: &str) -> Option<RecommendationSet> {
        let resolved = self.resolve(query)?;

        let engine = RecommendationEngine::with_options(&self.index, self.settings.recommend_options());
        let cohort = engine.cohort(resolved.item_id);
        let recommendations: Vec<Recommendation> = engine
            .rank(resolved.item_id, &cohort)
            .into_iter()
            .map(|c| self.describe(c.item_id, c.score))
            .collect();

        tracing::info!(
            item_id = resolved.item_id,
            title = %resolved.title,
            cohort = cohort.len(),
            recommendations = recommendations.len(),
            "Recommendations generated"
        );

        Some(RecommendationSet {
            query: query.to_string(),
            resolved,
            cohort_size: cohort.len(),
            recommendations,
        })
    }

    pub fn signature(&self, user_id: UserId) -> Option<&UserSignature> {
        self.signatures.get(&user_id)
    }

    /// Estimated Jaccard similarity of two users' rated-item sets
    pub fn estimated_similarity(&self, a: UserId, b: UserId) -> Option<f64> {
        estimate_jaccard(self.signature(a)?, self.signature(b)?)
    }

    fn describe(&self, item_id: ItemId, score: f64) -> Recommendation {
        Recommendation {
            item_id,
            title: self.catalog.title(item_id).map(str::to_string),
            score,
        }
    }
}
