use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    recommendations_total: AtomicU64,
    policy_analyses_total: AtomicU64,
    invalid_queries_total: AtomicU64,
    chat_turns_total: AtomicU64,
    fallback_total: AtomicU64,
    total_latency_micros: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub recommendations_total: u64,
    pub policy_analyses_total: u64,
    pub invalid_queries_total: u64,
    pub chat_turns_total: u64,
    pub fallback_total: u64,
    pub avg_latency_micros: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("prayaas_requests_total").increment(1);
    }

    pub fn inc_recommendation(&self) {
        self.recommendations_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("prayaas_recommendations_total").increment(1);
    }

    pub fn inc_policy_analysis(&self) {
        self.policy_analyses_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("prayaas_policy_analyses_total").increment(1);
    }

    pub fn inc_invalid_query(&self) {
        self.invalid_queries_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("prayaas_invalid_queries_total").increment(1);
    }

    pub fn inc_chat_turn(&self) {
        self.chat_turns_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("prayaas_chat_turns_total").increment(1);
    }

    /// Counts answers that fell through to the profile-summary template.
    pub fn inc_fallback(&self) {
        self.fallback_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("prayaas_fallback_total").increment(1);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_micros.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: requests,
            recommendations_total: self.recommendations_total.load(Ordering::Relaxed),
            policy_analyses_total: self.policy_analyses_total.load(Ordering::Relaxed),
            invalid_queries_total: self.invalid_queries_total.load(Ordering::Relaxed),
            chat_turns_total: self.chat_turns_total.load(Ordering::Relaxed),
            fallback_total: self.fallback_total.load(Ordering::Relaxed),
            avg_latency_micros: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,prayaas_api=info,prayaas_agents=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
