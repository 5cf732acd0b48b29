pub mod dataset;
pub mod engine;
pub mod rating_index;
pub mod recommendations;
pub mod signatures;
pub mod title_resolver;

pub use dataset::{CsvDataset, DatasetSource};
pub use engine::{EngineSettings, Recommender};
pub use rating_index::RatingIndex;
pub use recommendations::{RecommendOptions, RecommendationEngine};
pub use signatures::{estimate_jaccard, SignatureGenerator};
pub use title_resolver::{fuzzy_ratio, TitleResolver};
