//! # Quest Metrics
//!
//! Process-wide counters exported in Prometheus text format.

use heartquest_core::StageId;
use heartquest_core::primitives::STAGE_COUNT;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the handlers.
#[derive(Debug, Default)]
pub struct QuestMetrics {
    stage_completions: [AtomicU64; STAGE_COUNT],
    answers_rejected: AtomicU64,
    rewards_viewed: AtomicU64,
}

impl QuestMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A stage's flag flipped from false to true.
    pub fn record_completion(&self, stage: StageId) {
        self.stage_completions[stage.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.answers_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reward(&self) {
        self.rewards_viewed.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn completions(&self, stage: StageId) -> u64 {
        self.stage_completions[stage.index()].load(Ordering::Relaxed)
    }

    /// Render every metric, with `active_sessions` as the session gauge.
    #[must_use]
    pub fn render(&self, active_sessions: usize) -> String {
        let mut out = String::new();

        out.push_str("# HELP heartquest_sessions_active Sessions currently held in memory.\n");
        out.push_str("# TYPE heartquest_sessions_active gauge\n");
        let _ = writeln!(out, "heartquest_sessions_active {}", active_sessions);

        out.push_str("# HELP heartquest_stage_completions_total Stages completed for the first time.\n");
        out.push_str("# TYPE heartquest_stage_completions_total counter\n");
        for stage in StageId::ALL {
            let _ = writeln!(
                out,
                "heartquest_stage_completions_total{{stage=\"{}\"}} {}",
                stage.slug(),
                self.completions(stage)
            );
        }

        out.push_str("# HELP heartquest_answers_rejected_total Submissions judged incorrect.\n");
        out.push_str("# TYPE heartquest_answers_rejected_total counter\n");
        let _ = writeln!(
            out,
            "heartquest_answers_rejected_total {}",
            self.answers_rejected.load(Ordering::Relaxed)
        );

        out.push_str("# HELP heartquest_rewards_viewed_total Successful reward views.\n");
        out.push_str("# TYPE heartquest_rewards_viewed_total counter\n");
        let _ = writeln!(
            out,
            "heartquest_rewards_viewed_total {}",
            self.rewards_viewed.load(Ordering::Relaxed)
        );

        out
    }
}
