use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;
use crate::models::UserProfile;

/// Cover paid per `REFERENCE_PREMIUM` of annual premium at projection step 0.
pub const REFERENCE_COVER: f64 = 100_000.0;
pub const REFERENCE_PREMIUM: f64 = 17_500.0;
pub const PROJECTION_STEPS: u8 = 5;
pub const YEARS_PER_STEP: u8 = 5;
pub const ANNUAL_GROWTH: f64 = 1.05;

const DEFAULT_AFFORDABILITY: i32 = 70;
const DEFAULT_COVERAGE: i32 = 75;
const DEFAULT_BENEFITS: i32 = 80;

/// A sub-score held within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub fn new(value: i32) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Recommended,
    ModeratelyRecommended,
    NotRecommended,
}

impl Verdict {
    pub fn from_score(score: Score) -> Self {
        match score.value() {
            70..=100 => Self::Recommended,
            50..=69 => Self::ModeratelyRecommended,
            _ => Self::NotRecommended,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Recommended => "Recommended",
            Self::ModeratelyRecommended => "Moderately Recommended",
            Self::NotRecommended => "Not Recommended",
        }
    }
}

/// Raw facts for a policy as returned by a catalog. Scores outside `[0, 100]` are
/// clamped when the card is built; `None` sub-scores fall back to the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyFacts {
    pub premium_range: String,
    pub coverage_amount: String,
    pub term_length: String,
    pub key_features: Vec<String>,
    pub baseline_premium: f64,
    pub coverage_value: u64,
    pub affordability: Option<i32>,
    pub coverage: Option<i32>,
    pub benefits: Option<i32>,
    pub claim_settlement: i32,
    pub flexibility: i32,
    pub overall_suitability: i32,
}

pub trait PolicyCatalog: Send + Sync {
    fn lookup(&self, profile: &UserProfile, policy_name: &str) -> PolicyFacts;
}

/// Answers every lookup with the same reference policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceCatalog;

impl PolicyCatalog for ReferenceCatalog {
    fn lookup(&self, _profile: &UserProfile, _policy_name: &str) -> PolicyFacts {
        PolicyFacts {
            premium_range: "₹15,000 - ₹20,000".to_string(),
            coverage_amount: "₹20 Lakhs".to_string(),
            term_length: "25 years".to_string(),
            key_features: vec![
                "Comprehensive life cover with maturity benefits".to_string(),
                "Tax benefits under Section 80C and 10(10D)".to_string(),
                "Flexible premium payment options".to_string(),
                "Accidental death and disability benefit".to_string(),
                "Option to increase coverage without medical checkup".to_string(),
            ],
            baseline_premium: REFERENCE_PREMIUM,
            coverage_value: 2_000_000,
            affordability: Some(82),
            coverage: Some(75),
            benefits: Some(85),
            claim_settlement: 87,
            flexibility: 72,
            overall_suitability: 78,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub affordability: Score,
    pub coverage: Score,
    pub benefits: Score,
    pub claim_settlement: Score,
    pub flexibility: Score,
    pub overall_suitability: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAxis {
    pub subject: String,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyScoreCard {
    pub policy_name: String,
    pub premium_range: String,
    pub coverage_amount: String,
    pub term_length: String,
    pub key_features: Vec<String>,
    pub baseline_premium: f64,
    pub coverage_value: u64,
    pub scores: SubScores,
}

impl PolicyScoreCard {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_score(self.scores.overall_suitability)
    }

    /// All six sub-scores, in radar order.
    pub fn radar_axes(&self) -> Vec<ScoreAxis> {
        let mut axes = self.metric_bars();
        axes.push(axis("Overall", self.scores.overall_suitability));
        axes
    }

    /// The five component scores without the overall rating.
    pub fn metric_bars(&self) -> Vec<ScoreAxis> {
        let scores = &self.scores;
        vec![
            axis("Affordability", scores.affordability),
            axis("Coverage", scores.coverage),
            axis("Benefits", scores.benefits),
            axis("Claims", scores.claim_settlement),
            axis("Flexibility", scores.flexibility),
        ]
    }

    pub fn benefit_projection(&self, age: u8) -> Vec<BenefitPoint> {
        project_benefits(age, self.baseline_premium)
    }

    pub fn summary_note(&self, profile: &UserProfile) -> String {
        format!(
            "This policy has been analyzed against your profile including age ({age}), income ({income}), family size ({family} members), and current insurance portfolio.",
            age = profile.age,
            income = profile.income_range.label(),
            family = profile.family_members,
        )
    }
}

fn axis(subject: &str, score: Score) -> ScoreAxis {
    ScoreAxis {
        subject: subject.to_string(),
        value: score.value(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct PolicyScorer<C = ReferenceCatalog> {
    catalog: C,
}

impl<C: PolicyCatalog> PolicyScorer<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn score(
        &self,
        profile: &UserProfile,
        policy_name: &str,
    ) -> Result<PolicyScoreCard, AdvisorError> {
        let policy_name = policy_name.trim();
        if policy_name.is_empty() {
            return Err(AdvisorError::InvalidQuery);
        }

        let facts = self.catalog.lookup(profile, policy_name);
        let scores = SubScores {
            affordability: Score::new(facts.affordability.unwrap_or(DEFAULT_AFFORDABILITY)),
            coverage: Score::new(facts.coverage.unwrap_or(DEFAULT_COVERAGE)),
            benefits: Score::new(facts.benefits.unwrap_or(DEFAULT_BENEFITS)),
            claim_settlement: Score::new(facts.claim_settlement),
            flexibility: Score::new(facts.flexibility),
            overall_suitability: Score::new(facts.overall_suitability),
        };

        Ok(PolicyScoreCard {
            policy_name: policy_name.to_string(),
            premium_range: facts.premium_range,
            coverage_amount: facts.coverage_amount,
            term_length: facts.term_length,
            key_features: facts.key_features,
            baseline_premium: facts.baseline_premium,
            coverage_value: facts.coverage_value,
            scores,
        })
    }
}

pub fn score(profile: &UserProfile, policy_name: &str) -> Result<PolicyScoreCard, AdvisorError> {
    PolicyScorer::new(ReferenceCatalog).score(profile, policy_name)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenefitPoint {
    pub step: u8,
    pub age: u16,
    pub benefits: f64,
    pub premiums_paid: f64,
}

/// Five-yearly projection with 5% annual compounding on the cover.
pub fn project_benefits(age: u8, baseline_premium: f64) -> Vec<BenefitPoint> {
    let base_cover = baseline_premium * REFERENCE_COVER / REFERENCE_PREMIUM;

    (0..=PROJECTION_STEPS)
        .map(|step| {
            let years = i32::from(step) * i32::from(YEARS_PER_STEP);
            BenefitPoint {
                step,
                age: u16::from(age) + years as u16,
                benefits: base_cover * ANNUAL_GROWTH.powi(years),
                premiums_paid: baseline_premium * f64::from(years),
            }
        })
        .collect()
}
