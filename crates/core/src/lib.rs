pub mod catalog;
pub mod classifier;
pub mod error;
pub mod intent;
pub mod models;
pub mod scoring;
pub mod templates;

pub use catalog::{featured_policies, MatchBand, PolicyRecommendation};
pub use classifier::{classify, CategoryDistribution, CategoryWeight, FocusCategory, ProfileArchetype};
pub use error::AdvisorError;
pub use intent::{classify_topic, Topic};
pub use models::*;
pub use scoring::{
    project_benefits, score, BenefitPoint, PolicyCatalog, PolicyFacts, PolicyScoreCard,
    PolicyScorer, ReferenceCatalog, Score, ScoreAxis, SubScores, Verdict,
};
pub use templates::{respond, GREETING, SUGGESTED_QUESTIONS};
