use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    LifeInsurance,
    HealthInsurance,
    TaxBenefits,
    InvestmentComparison,
    ClaimSettlement,
    General,
}

/// Keyword sets checked top to bottom; the first set with a hit decides the topic.
/// Claims questions outrank the ULIP comparison when both vocabularies appear.
pub const TOPIC_RULES: &[(Topic, &[&str])] = &[
    (Topic::LifeInsurance, &["term life", "life insurance"]),
    (Topic::HealthInsurance, &["health insurance", "medical"]),
    (Topic::TaxBenefits, &["tax benefit", "80c"]),
    (Topic::ClaimSettlement, &["claim", "settlement"]),
    (Topic::InvestmentComparison, &["ulip", "investment"]),
];

/// Keywords are matched as plain substrings of the lower-cased text; whitespace is
/// taken as written.
pub fn classify_topic(text: &str) -> Topic {
    let lower = text.to_lowercase();

    TOPIC_RULES
        .iter()
        .find(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::General)
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
