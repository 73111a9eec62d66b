use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const AGE_RANGE: RangeInclusive<u8> = 18..=80;
pub const FAMILY_RANGE: RangeInclusive<u8> = 1..=10;

/// Declares a closed label set: wire code, display label, and lookup by either.
macro_rules! label_set {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident = $code:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Accepts either the wire code or the display label, ignoring ASCII case.
            pub fn parse(value: &str) -> Option<Self> {
                let needle = value.trim();
                Self::ALL.iter().copied().find(|candidate| {
                    candidate.code().eq_ignore_ascii_case(needle)
                        || candidate.label().eq_ignore_ascii_case(needle)
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

label_set! {
    /// Annual income brackets, declared low to high so `Ord` follows the bracket order.
    IncomeRange {
        UpTo2_5L = "up_to_2_5_lakh" => "Up to ₹2.5 Lakh",
        From2_5LTo5L = "2_5_to_5_lakh" => "₹2.5 Lakh - ₹5 Lakh",
        From5LTo7_5L = "5_to_7_5_lakh" => "₹5 Lakh - ₹7.5 Lakh",
        From7_5LTo10L = "7_5_to_10_lakh" => "₹7.5 Lakh - ₹10 Lakh",
        From10LTo15L = "10_to_15_lakh" => "₹10 Lakh - ₹15 Lakh",
        From15LTo20L = "15_to_20_lakh" => "₹15 Lakh - ₹20 Lakh",
        From20LTo30L = "20_to_30_lakh" => "₹20 Lakh - ₹30 Lakh",
        From30LTo50L = "30_to_50_lakh" => "₹30 Lakh - ₹50 Lakh",
        From50LTo1Cr = "50_lakh_to_1_crore" => "₹50 Lakh - ₹1 Crore",
        From1CrTo2Cr = "1_to_2_crore" => "₹1 Crore - ₹2 Crore",
        From2CrTo3Cr = "2_to_3_crore" => "₹2 Crore - ₹3 Crore",
        Above3Cr = "above_3_crore" => "Above ₹3 Crore",
    }
}

label_set! {
    Occupation {
        Farmer = "farmer" => "Farmer/Agricultural Worker",
        DailyWageLaborer = "daily_wage_laborer" => "Daily Wage Laborer",
        Shopkeeper = "shopkeeper" => "Shopkeeper/Retailer",
        Driver = "driver" => "Driver (Taxi, Truck, Auto)",
        DomesticWorker = "domestic_worker" => "Household Help/Domestic Worker",
        ConstructionWorker = "construction_worker" => "Construction Worker",
        SmallBusinessOwner = "small_business_owner" => "Small Business Owner",
        GovernmentEmployee = "government_employee" => "Government Employee",
        PrivateSectorEmployee = "private_sector_employee" => "Private Sector Employee",
        Teacher = "teacher" => "Teacher/Educator",
        HealthcareWorker = "healthcare_worker" => "Healthcare Worker",
        ItProfessional = "it_professional" => "IT Professional",
        Engineer = "engineer" => "Engineer",
        Student = "student" => "Student",
        Homemaker = "homemaker" => "Homemaker",
        Retired = "retired" => "Retired",
        Unemployed = "unemployed" => "Unemployed",
        Other = "other" => "Other",
    }
}

label_set! {
    InsuranceType {
        TermLife = "term_life" => "Term Life",
        Health = "health" => "Health Insurance",
        Car = "car" => "Car Insurance",
        Home = "home" => "Home Insurance",
        InvestmentPlans = "investment_plans" => "Investment Plans",
        None = "none" => "None",
    }
}

label_set! {
    HealthCondition {
        None = "none" => "None",
        Diabetes = "diabetes" => "Diabetes",
        Hypertension = "hypertension" => "Hypertension",
        HeartCondition = "heart_condition" => "Heart Condition",
        RespiratoryIssues = "respiratory_issues" => "Respiratory Issues",
        OtherChronic = "other_chronic" => "Other Chronic Condition",
    }
}

label_set! {
    /// Display language. Does not influence any advisory decision.
    Language {
        English = "en" => "English",
        Hindi = "hi" => "Hindi",
        Gujarati = "gu" => "Gujarati",
        Tamil = "ta" => "Tamil",
        Telugu = "te" => "Telugu",
        Bengali = "bn" => "Bengali",
        Marathi = "mr" => "Marathi",
        Kannada = "kn" => "Kannada",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u8,
    pub income_range: IncomeRange,
    pub occupation: Occupation,
    pub family_members: u8,
    #[serde(default)]
    pub existing_insurance: BTreeSet<InsuranceType>,
    #[serde(default = "default_health_conditions")]
    pub health_conditions: BTreeSet<HealthCondition>,
    #[serde(default = "default_language")]
    pub language: Language,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 30,
            income_range: IncomeRange::From5LTo7_5L,
            occupation: Occupation::PrivateSectorEmployee,
            family_members: 4,
            existing_insurance: BTreeSet::new(),
            health_conditions: default_health_conditions(),
            language: default_language(),
        }
    }
}

fn default_health_conditions() -> BTreeSet<HealthCondition> {
    BTreeSet::from([HealthCondition::None])
}

fn default_language() -> Language {
    Language::English
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            at: Utc::now(),
        }
    }
}
