mod conversation;
mod profile_input;

use std::sync::Arc;
use std::time::Instant;

use prayaas_core::{
    classify, classify_topic, featured_policies, respond, AdvisorError, BenefitPoint,
    CategoryDistribution, ConversationTurn, PolicyCatalog, PolicyRecommendation,
    PolicyScoreCard, PolicyScorer, ReferenceCatalog, ScoreAxis, Topic, UserProfile, Verdict,
    SUGGESTED_QUESTIONS,
};
use prayaas_observability::AppMetrics;
use serde::Serialize;
use tracing::{info, instrument, warn};

pub use conversation::{ChatSession, ConversationError, ConversationState, DEFAULT_MAX_TURNS};
pub use profile_input::{LabelOption, ProfileError, ProfileInput, ProfileOptions};

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub distribution: CategoryDistribution,
    pub featured: Vec<PolicyRecommendation>,
}

/// Everything the analysis view renders for one policy.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyAnalysis {
    pub card: PolicyScoreCard,
    pub verdict: Verdict,
    pub verdict_label: &'static str,
    pub radar: Vec<ScoreAxis>,
    pub metrics: Vec<ScoreAxis>,
    pub timeline: Vec<BenefitPoint>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub session_id: String,
    pub topic: Topic,
    pub reply_text: String,
    pub turn_count: usize,
}

pub struct AdvisorAgent<C = ReferenceCatalog>
where
    C: PolicyCatalog,
{
    scorer: Arc<PolicyScorer<C>>,
    metrics: Arc<AppMetrics>,
    max_turns: usize,
}

impl<C> Clone for AdvisorAgent<C>
where
    C: PolicyCatalog,
{
    fn clone(&self) -> Self {
        Self {
            scorer: Arc::clone(&self.scorer),
            metrics: Arc::clone(&self.metrics),
            max_turns: self.max_turns,
        }
    }
}

impl AdvisorAgent<ReferenceCatalog> {
    pub fn with_reference_catalog(metrics: Arc<AppMetrics>) -> Self {
        Self::new(ReferenceCatalog, metrics)
    }
}

impl<C> AdvisorAgent<C>
where
    C: PolicyCatalog,
{
    pub fn new(catalog: C, metrics: Arc<AppMetrics>) -> Self {
        Self {
            scorer: Arc::new(PolicyScorer::new(catalog)),
            metrics,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    #[instrument(skip(self, profile), fields(age = profile.age, family = profile.family_members))]
    pub fn recommend(&self, profile: &UserProfile) -> RecommendationReport {
        let started = Instant::now();
        self.metrics.inc_request();
        self.metrics.inc_recommendation();

        let distribution = classify(profile);
        info!(archetype = ?distribution.archetype, "recommendation built");

        self.metrics.observe_latency(started.elapsed());
        RecommendationReport {
            distribution,
            featured: featured_policies(),
        }
    }

    #[instrument(skip(self, profile))]
    pub fn analyze_policy(
        &self,
        profile: &UserProfile,
        policy_name: &str,
    ) -> Result<PolicyAnalysis, AdvisorError> {
        let started = Instant::now();
        self.metrics.inc_request();

        let card = match self.scorer.score(profile, policy_name) {
            Ok(card) => card,
            Err(err) => {
                self.metrics.inc_invalid_query();
                warn!(error = %err, "policy analysis rejected");
                return Err(err);
            }
        };
        self.metrics.inc_policy_analysis();

        let verdict = card.verdict();
        info!(
            policy = %card.policy_name,
            suitability = card.scores.overall_suitability.value(),
            verdict = ?verdict,
            "policy analysed"
        );

        let analysis = PolicyAnalysis {
            verdict,
            verdict_label: verdict.label(),
            radar: card.radar_axes(),
            metrics: card.metric_bars(),
            timeline: card.benefit_projection(profile.age),
            summary: card.summary_note(profile),
            card,
        };

        self.metrics.observe_latency(started.elapsed());
        Ok(analysis)
    }

    pub fn start_conversation(&self) -> ChatSession {
        let session = ChatSession::new(self.max_turns);
        info!(session_id = %session.session_id(), "conversation started");
        session
    }

    pub fn suggested_questions(&self) -> &'static [&'static str] {
        &SUGGESTED_QUESTIONS
    }

    /// Stateless answer for one question. Callers that keep a transcript should go
    /// through [`AdvisorAgent::chat`] so the single-flight rule is applied.
    pub fn answer(
        &self,
        profile: &UserProfile,
        question: &str,
        history: &[ConversationTurn],
    ) -> (Topic, String) {
        let topic = classify_topic(question);
        if topic == Topic::General {
            self.metrics.inc_fallback();
        }
        (topic, respond(profile, question, history))
    }

    /// Closes the pending question of `session` with `reply`.
    pub fn record_reply(
        &self,
        session: &mut ChatSession,
        reply: String,
    ) -> Result<(), ConversationError> {
        session.resolve(reply)?;
        self.metrics.inc_chat_turn();
        Ok(())
    }

    #[instrument(skip(self, session, profile, text), fields(session_id = %session.session_id()))]
    pub fn chat(
        &self,
        session: &mut ChatSession,
        profile: &UserProfile,
        text: &str,
    ) -> Result<ChatReply, ConversationError> {
        let started = Instant::now();
        self.metrics.inc_request();

        session.submit(text)?;
        let (topic, reply_text) = self.answer(profile, text, session.turns());
        self.record_reply(session, reply_text.clone())?;

        info!(topic = ?topic, turns = session.turns().len(), "chat handled");
        self.metrics.observe_latency(started.elapsed());

        Ok(ChatReply {
            session_id: session.session_id().to_string(),
            topic,
            reply_text,
            turn_count: session.turns().len(),
        })
    }
}
