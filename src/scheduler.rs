use futures::future::join_all;
use std::sync::Arc;

use crate::data_models::{CandidateItem, ProbeOutcome};
use crate::probe::Prober;

/// Result of one scheduling round.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// One outcome per probed candidate, in input order.
    pub outcomes: Vec<ProbeOutcome>,
    /// Candidates past the concurrency cap, in input order. Never probed.
    pub unprobed: Vec<CandidateItem>,
}

impl Classification {
    pub fn displayable(&self) -> Vec<CandidateItem> {
        self.outcomes
            .iter()
            .filter(|o| o.displayable())
            .map(|o| o.item.clone())
            .collect()
    }

    /// Every candidate, probed first then unprobed, in input order.
    pub fn into_candidates(self) -> Vec<CandidateItem> {
        self.outcomes
            .into_iter()
            .map(|o| o.item)
            .chain(self.unprobed)
            .collect()
    }
}

/// Fans probes out over a prefix of the candidate list and waits for all of
/// them.
pub struct ProbeScheduler {
    prober: Arc<dyn Prober>,
}

impl ProbeScheduler {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    pub async fn classify(
        &self,
        mut candidates: Vec<CandidateItem>,
        concurrency_cap: usize,
    ) -> Classification {
        let unprobed = candidates.split_off(concurrency_cap.min(candidates.len()));

        // join_all yields results in input order regardless of completion order.
        let verdicts = join_all(candidates.iter().map(|item| self.prober.probe(&item.link))).await;

        let outcomes: Vec<ProbeOutcome> = candidates
            .into_iter()
            .zip(verdicts)
            .map(|(item, verdict)| ProbeOutcome { item, verdict })
            .collect();

        let passed = outcomes.iter().filter(|o| o.displayable()).count();
        tracing::info!(
            "probed {} candidates: {passed} displayable, {} unprobed",
            outcomes.len(),
            unprobed.len()
        );

        Classification { outcomes, unprobed }
    }
}
