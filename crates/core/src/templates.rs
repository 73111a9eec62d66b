use crate::intent::{classify_topic, Topic};
use crate::models::{ConversationTurn, UserProfile};

pub const GREETING: &str = "Hello! I'm PRAYAAS, your insurance assistant. I can help you understand insurance policies, answer your questions, and provide personalized advice based on your profile. Feel free to ask me anything about insurance!";

pub const SUGGESTED_QUESTIONS: [&str; 6] = [
    "What's the difference between term life and whole life insurance?",
    "How much life insurance coverage do I need?",
    "Which health insurance is best for my family?",
    "What are the tax benefits of insurance policies?",
    "Should I invest in ULIPs or traditional insurance?",
    "How to claim insurance benefits quickly?",
];

/// Insurer ranking quoted in the claims answer, as (insurer, claim settlement ratio).
pub const CLAIM_SETTLEMENT_RANKING: [(&str, &str); 4] = [
    ("Max Life", "99.34%"),
    ("HDFC Life", "98.01%"),
    ("ICICI Prudential", "97.90%"),
    ("SBI Life", "97.83%"),
];

/// Answers a free-text question. `history` is accepted so callers can pass the
/// running conversation; routing currently looks at the latest question only.
pub fn respond(profile: &UserProfile, query: &str, _history: &[ConversationTurn]) -> String {
    render_topic(classify_topic(query), profile)
}

pub fn render_topic(topic: Topic, profile: &UserProfile) -> String {
    match topic {
        Topic::LifeInsurance => life_insurance(profile),
        Topic::HealthInsurance => health_insurance(profile),
        Topic::TaxBenefits => tax_benefits(profile),
        Topic::InvestmentComparison => investment_comparison(),
        Topic::ClaimSettlement => claim_settlement(),
        Topic::General => profile_summary(profile),
    }
}

fn life_insurance(profile: &UserProfile) -> String {
    format!(
        "Based on your profile (age {age}, income {income}), I'd recommend considering term life insurance. Term life provides high coverage at low premiums, which is ideal for your family of {family} members.

For someone in your income bracket, a coverage of 10-15 times your annual income is generally recommended. This would provide financial security for your family in case of unforeseen circumstances.

Would you like me to recommend specific term life insurance policies that match your profile?",
        age = profile.age,
        income = profile.income_range.label(),
        family = profile.family_members,
    )
}

fn health_insurance(profile: &UserProfile) -> String {
    format!(
        "Health insurance is crucial for your family! With {family} members, I'd suggest looking at family floater health insurance policies.

Key considerations for your profile:
- Family floater vs individual policies
- Coverage amount (₹5-10 lakhs minimum recommended)
- Network hospitals in your area
- Pre-existing disease coverage
- Maternity benefits (if applicable)

Some good options include Star Health Red Carpet, HDFC Ergo My Health Suraksha, and Care Supreme. Would you like detailed comparisons?",
        family = profile.family_members,
    )
}

fn tax_benefits(profile: &UserProfile) -> String {
    format!(
        "Great question about tax benefits! Insurance policies offer excellent tax advantages:

**Section 80C Benefits:**
- Life insurance premiums: Up to ₹1.5 lakh deduction
- ELSS, PPF, and other investments also count

**Section 80D Benefits:**
- Health insurance premiums: Up to ₹25,000 for self/family
- Additional ₹25,000 for parents (₹50,000 if parents are senior citizens)

**Section 10(10D):**
- Life insurance maturity proceeds are tax-free

Given your income range of {income}, you could save significant taxes while securing your family's future!",
        income = profile.income_range.label(),
    )
}

fn investment_comparison() -> String {
    "ULIPs vs Traditional Insurance - good question for someone in your income bracket!

**ULIPs (Unit Linked Insurance Plans):**
- ✅ Market-linked returns potential
- ✅ Flexibility to switch funds
- ❌ Higher charges and complexity
- ❌ Market risk

**Traditional Insurance:**
- ✅ Guaranteed returns
- ✅ Simple and transparent
- ❌ Lower returns compared to equity markets

For your profile, I'd generally recommend:
1. Pure term insurance for protection
2. Separate mutual fund SIPs for investment
This typically gives better returns with lower costs!"
        .to_string()
}

fn claim_settlement() -> String {
    let ranking = CLAIM_SETTLEMENT_RANKING
        .iter()
        .map(|(insurer, ratio)| format!("- {insurer}: {ratio}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Insurance claim settlement is crucial! Here's what to look for:

**Top insurers by claim settlement ratio (2023-24):**
{ranking}

**Tips for smooth claims:**
1. Always disclose health conditions honestly
2. Keep all policy documents updated
3. Inform nominees about policies
4. Submit claims promptly with complete documentation
5. Follow up regularly

The key is choosing insurers with good claim settlement ratios and maintaining transparency throughout!"
    )
}

fn profile_summary(profile: &UserProfile) -> String {
    format!(
        "Thank you for your question! As your insurance assistant, I'm here to help you make informed decisions about insurance.

Based on your profile:
- Age: {age}
- Income: {income}
- Family: {family} members
- Occupation: {occupation}

I can provide personalized advice on life insurance, health insurance, investment plans, and more. Feel free to ask specific questions, or try one of the suggested topics below!

Is there a particular insurance type or concern you'd like to discuss?",
        age = profile.age,
        income = profile.income_range.label(),
        family = profile.family_members,
        occupation = profile.occupation.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IncomeRange, Occupation};

    fn profile() -> UserProfile {
        UserProfile {
            age: 37,
            income_range: IncomeRange::From15LTo20L,
            occupation: Occupation::Teacher,
            family_members: 3,
            ..UserProfile::default()
        }
    }

    #[test]
    fn life_question_interpolates_age_and_income() {
        let reply = respond(&profile(), "How much life insurance coverage do I need?", &[]);
        assert!(reply.starts_with("Based on your profile (age 37, income ₹15 Lakh - ₹20 Lakh)"));
        assert!(reply.contains("family of 3 members"));
    }

    #[test]
    fn ambiguous_claims_question_gets_claims_template() {
        let reply = respond(&profile(), "tell me about claim settlement ulip", &[]);
        assert!(reply.starts_with("Insurance claim settlement is crucial!"));
        assert!(reply.contains("- Max Life: 99.34%"));
        assert!(reply.contains("- SBI Life: 97.83%"));
        assert!(!reply.contains("ULIPs vs Traditional"));
    }

    #[test]
    fn fallback_summarises_the_profile() {
        let reply = respond(&profile(), "what should I do?", &[]);
        assert!(reply.contains("- Age: 37"));
        assert!(reply.contains("- Occupation: Teacher/Educator"));
        assert!(reply.contains("- Family: 3 members"));
    }

    #[test]
    fn history_does_not_change_the_answer() {
        let history = vec![
            ConversationTurn::assistant(GREETING),
            ConversationTurn::user("How do tax benefits work?"),
        ];
        assert_eq!(
            respond(&profile(), "medical cover", &history),
            respond(&profile(), "medical cover", &[])
        );
    }

    #[test]
    fn profile_independent_templates_ignore_profile() {
        let other = UserProfile::default();
        for query in ["ulip returns", "claim help"] {
            assert_eq!(respond(&profile(), query, &[]), respond(&other, query, &[]));
        }
    }

    #[test]
    fn never_empty() {
        let mut queries = vec!["", "   ", "???", "नमस्ते"];
        queries.extend(SUGGESTED_QUESTIONS);
        for query in queries {
            assert!(!respond(&profile(), query, &[]).trim().is_empty(), "{query:?}");
        }
        for topic in [
            Topic::LifeInsurance,
            Topic::HealthInsurance,
            Topic::TaxBenefits,
            Topic::InvestmentComparison,
            Topic::ClaimSettlement,
            Topic::General,
        ] {
            assert!(!render_topic(topic, &profile()).is_empty());
        }
    }
}
