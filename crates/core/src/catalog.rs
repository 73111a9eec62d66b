use serde::{Deserialize, Serialize};

/// Badge tier shown next to a featured policy's match percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Strong,
    Fair,
    Weak,
}

impl MatchBand {
    pub fn from_suitability(suitability: u8) -> Self {
        match suitability {
            80.. => Self::Strong,
            60..=79 => Self::Fair,
            _ => Self::Weak,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecommendation {
    pub name: String,
    pub company: String,
    pub premium: String,
    pub coverage: String,
    pub suitability: u8,
    pub band: MatchBand,
    pub key_features: Vec<String>,
    pub description: String,
}

struct FeaturedPolicy {
    name: &'static str,
    company: &'static str,
    premium: &'static str,
    coverage: &'static str,
    suitability: u8,
    key_features: &'static [&'static str],
    description: &'static str,
}

const FEATURED: [FeaturedPolicy; 3] = [
    FeaturedPolicy {
        name: "Jeevan Anand Plus",
        company: "LIC of India",
        premium: "₹12,000 - ₹15,000",
        coverage: "₹15 Lakhs",
        suitability: 85,
        key_features: &[
            "Death Benefit",
            "Maturity Benefit",
            "Tax Benefits",
            "Loan Facility",
        ],
        description: "A comprehensive life insurance plan with savings component",
    },
    FeaturedPolicy {
        name: "Star Health Red Carpet",
        company: "Star Health Insurance",
        premium: "₹8,500 - ₹12,000",
        coverage: "₹10 Lakhs Family",
        suitability: 78,
        key_features: &[
            "Family Coverage",
            "Pre-existing Disease Cover",
            "No Room Rent Limit",
            "Wellness Benefits",
        ],
        description: "Premium health insurance with comprehensive family coverage",
    },
    FeaturedPolicy {
        name: "HDFC Life Click 2 Protect Plus",
        company: "HDFC Life",
        premium: "₹6,000 - ₹9,000",
        coverage: "₹25 Lakhs",
        suitability: 92,
        key_features: &[
            "Pure Term Plan",
            "High Coverage",
            "Online Application",
            "Accidental Benefits",
        ],
        description: "Affordable term insurance with high coverage at low premiums",
    },
];

/// Curated policies shown alongside the focus-area breakdown. Fixed list, catalog order.
pub fn featured_policies() -> Vec<PolicyRecommendation> {
    FEATURED
        .iter()
        .map(|policy| PolicyRecommendation {
            name: policy.name.to_string(),
            company: policy.company.to_string(),
            premium: policy.premium.to_string(),
            coverage: policy.coverage.to_string(),
            suitability: policy.suitability,
            band: MatchBand::from_suitability(policy.suitability),
            key_features: policy
                .key_features
                .iter()
                .map(|feature| feature.to_string())
                .collect(),
            description: policy.description.to_string(),
        })
        .collect()
}
