use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusCategory {
    HealthInsurance,
    CriticalIllness,
    SeniorBenefits,
    FamilyHealth,
    TermLife,
    ChildEducation,
    Investment,
}

impl FocusCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::HealthInsurance => "Health Insurance",
            Self::CriticalIllness => "Critical Illness",
            Self::SeniorBenefits => "Senior Benefits",
            Self::FamilyHealth => "Family Health",
            Self::TermLife => "Term Life",
            Self::ChildEducation => "Child Education",
            Self::Investment => "Investment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileArchetype {
    Senior,
    LargeFamily,
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryShare {
    pub category: FocusCategory,
    pub weight_percent: u8,
    pub color_tag: &'static str,
}

/// One row of the classification table. `applies` is tested in table order.
pub struct ClassificationRule {
    pub archetype: ProfileArchetype,
    pub applies: fn(&UserProfile) -> bool,
    pub shares: &'static [CategoryShare],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWeight {
    pub category: FocusCategory,
    pub label: String,
    pub weight_percent: u8,
    pub color_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDistribution {
    pub archetype: ProfileArchetype,
    pub entries: Vec<CategoryWeight>,
}

impl CategoryDistribution {
    pub fn total_weight(&self) -> u32 {
        self.entries
            .iter()
            .map(|entry| u32::from(entry.weight_percent))
            .sum()
    }

    pub fn weight_of(&self, category: FocusCategory) -> Option<u8> {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.weight_percent)
    }
}

const fn share(category: FocusCategory, weight_percent: u8, color_tag: &'static str) -> CategoryShare {
    CategoryShare {
        category,
        weight_percent,
        color_tag,
    }
}

fn is_senior(profile: &UserProfile) -> bool {
    profile.age > 50
}

fn has_large_family(profile: &UserProfile) -> bool {
    profile.family_members > 3
}

fn always(_: &UserProfile) -> bool {
    true
}

const SENIOR: ClassificationRule = ClassificationRule {
    archetype: ProfileArchetype::Senior,
    applies: is_senior,
    shares: &[
        share(FocusCategory::HealthInsurance, 45, "#ef4444"),
        share(FocusCategory::CriticalIllness, 35, "#f97316"),
        share(FocusCategory::SeniorBenefits, 20, "#eab308"),
    ],
};

const LARGE_FAMILY: ClassificationRule = ClassificationRule {
    archetype: ProfileArchetype::LargeFamily,
    applies: has_large_family,
    shares: &[
        share(FocusCategory::FamilyHealth, 40, "#22c55e"),
        share(FocusCategory::TermLife, 35, "#3b82f6"),
        share(FocusCategory::ChildEducation, 25, "#a855f7"),
    ],
};

// Income, occupation and existing cover are not consulted yet; they are the
// natural inputs for a finer-grained table.
const STANDARD: ClassificationRule = ClassificationRule {
    archetype: ProfileArchetype::Standard,
    applies: always,
    shares: &[
        share(FocusCategory::TermLife, 45, "#3b82f6"),
        share(FocusCategory::HealthInsurance, 35, "#22c55e"),
        share(FocusCategory::Investment, 20, "#f59e0b"),
    ],
};

static RULES: [ClassificationRule; 3] = [SENIOR, LARGE_FAMILY, STANDARD];

pub fn classification_rules() -> &'static [ClassificationRule] {
    &RULES
}

pub fn classify(profile: &UserProfile) -> CategoryDistribution {
    let rule = RULES
        .iter()
        .find(|rule| (rule.applies)(profile))
        .unwrap_or(&STANDARD);

    CategoryDistribution {
        archetype: rule.archetype,
        entries: rule
            .shares
            .iter()
            .map(|share| CategoryWeight {
                category: share.category,
                label: share.category.label().to_string(),
                weight_percent: share.weight_percent,
                color_tag: share.color_tag.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IncomeRange, InsuranceType, Occupation};

    fn profile(age: u8, family_members: u8) -> UserProfile {
        UserProfile {
            age,
            family_members,
            ..UserProfile::default()
        }
    }

    fn weights(distribution: &CategoryDistribution) -> Vec<(&str, u8)> {
        distribution
            .entries
            .iter()
            .map(|entry| (entry.label.as_str(), entry.weight_percent))
            .collect()
    }

    #[test]
    fn seniors_get_health_first_regardless_of_family() {
        for family_members in 1..=10 {
            let distribution = classify(&profile(51, family_members));
            assert_eq!(distribution.archetype, ProfileArchetype::Senior);
            assert_eq!(
                weights(&distribution),
                vec![
                    ("Health Insurance", 45),
                    ("Critical Illness", 35),
                    ("Senior Benefits", 20)
                ]
            );
        }
    }

    #[test]
    fn large_families_under_fifty_one() {
        let distribution = classify(&profile(50, 4));
        assert_eq!(distribution.archetype, ProfileArchetype::LargeFamily);
        assert_eq!(
            weights(&distribution),
            vec![("Family Health", 40), ("Term Life", 35), ("Child Education", 25)]
        );
    }

    #[test]
    fn small_households_fall_through_to_standard() {
        let distribution = classify(&profile(18, 3));
        assert_eq!(distribution.archetype, ProfileArchetype::Standard);
        assert_eq!(
            weights(&distribution),
            vec![("Term Life", 45), ("Health Insurance", 35), ("Investment", 20)]
        );
    }

    #[test]
    fn income_and_cover_do_not_move_the_result() {
        let base = classify(&profile(35, 2));
        let wealthy = classify(&UserProfile {
            income_range: IncomeRange::Above3Cr,
            occupation: Occupation::SmallBusinessOwner,
            existing_insurance: [InsuranceType::TermLife, InsuranceType::Health]
                .into_iter()
                .collect(),
            ..profile(35, 2)
        });
        assert_eq!(base, wealthy);
    }

    #[test]
    fn every_distribution_sums_to_one_hundred() {
        for age in 18..=80 {
            for family_members in 1..=10 {
                assert_eq!(classify(&profile(age, family_members)).total_weight(), 100);
            }
        }
        for rule in classification_rules() {
            let total: u32 = rule.shares.iter().map(|s| u32::from(s.weight_percent)).sum();
            assert_eq!(total, 100, "{:?}", rule.archetype);
        }
    }

    #[test]
    fn rule_table_keeps_priority_order() {
        let order: Vec<_> = classification_rules()
            .iter()
            .map(|rule| rule.archetype)
            .collect();
        assert_eq!(
            order,
            vec![
                ProfileArchetype::Senior,
                ProfileArchetype::LargeFamily,
                ProfileArchetype::Standard
            ]
        );
        assert_eq!(classify(&profile(60, 6)).weight_of(FocusCategory::FamilyHealth), None);
    }
}
