use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::combiner::{RESULT_CAP, combine};
use crate::config::DEFAULT_PROBE_CONCURRENCY;
use crate::data_models::{CandidateItem, ResultItem, ResultSet, SearchQuery};
use crate::domain_filter::StaticDomainFilter;
use crate::error::SearchError;
use crate::probe::Prober;
use crate::scheduler::ProbeScheduler;
use crate::upstream::{SearchProvider, UpstreamPager};

/// Knobs for one search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePolicy {
    pub target_count: usize,
    pub max_fetches: usize,
    pub apply_static_filter: bool,
    pub concurrency_cap: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelinePolicy {
    /// Used when the caller asks for embeddable results only.
    pub filtered: ModePolicy,
    pub unfiltered: ModePolicy,
    pub result_cap: usize,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self::with_concurrency(DEFAULT_PROBE_CONCURRENCY)
    }
}

impl PipelinePolicy {
    pub fn with_concurrency(concurrency_cap: usize) -> Self {
        PipelinePolicy {
            filtered: ModePolicy {
                target_count: 30,
                max_fetches: 5,
                apply_static_filter: true,
                concurrency_cap,
            },
            unfiltered: ModePolicy {
                target_count: RESULT_CAP,
                max_fetches: 1,
                apply_static_filter: false,
                concurrency_cap: concurrency_cap.min(RESULT_CAP),
            },
            result_cap: RESULT_CAP,
        }
    }

    pub fn for_query(&self, query: &SearchQuery) -> ModePolicy {
        if query.filter_embeddable() {
            self.filtered
        } else {
            self.unfiltered
        }
    }
}

/// Request-scoped search: page upstream, filter, probe, combine.
pub struct SearchPipeline {
    provider: Arc<dyn SearchProvider>,
    scheduler: ProbeScheduler,
    domain_filter: StaticDomainFilter,
    policy: PipelinePolicy,
}

impl SearchPipeline {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        prober: Arc<dyn Prober>,
        domain_filter: StaticDomainFilter,
        policy: PipelinePolicy,
    ) -> Self {
        Self {
            provider,
            scheduler: ProbeScheduler::new(prober),
            domain_filter,
            policy,
        }
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<ResultSet, SearchError> {
        let start = Instant::now();
        let mode = self.policy.for_query(query);

        let candidates = UpstreamPager::new(self.provider.as_ref())
            .fetch_candidates(query.text(), mode.target_count, mode.max_fetches)
            .await?;

        let upstream_count = candidates.len();
        let (eligible, denied) = if mode.apply_static_filter {
            self.domain_filter.partition(candidates)
        } else {
            (candidates, Vec::new())
        };
        let eligible_count = eligible.len();

        let classification = self
            .scheduler
            .classify(eligible, mode.concurrency_cap)
            .await;
        let verdicts: HashMap<String, bool> = classification
            .outcomes
            .iter()
            .map(|o| (o.item.link.clone(), o.displayable()))
            .collect();
        let displayable = classification.displayable();
        let eligible = classification.into_candidates();

        let mut combined = combine(&displayable, &eligible, self.policy.result_cap);
        // Denylisted candidates are only used once everything else is spent.
        if combined.len() < self.policy.result_cap && !denied.is_empty() {
            combined = combine(&combined, &denied, self.policy.result_cap);
        }

        let items = combined
            .into_iter()
            .map(|item| annotate(item, &verdicts))
            .collect::<Vec<_>>();

        tracing::info!(
            "search {:?} (filter={}): {upstream_count} upstream, {eligible_count} eligible, {} returned in {}ms",
            query.text(),
            query.filter_embeddable(),
            items.len(),
            start.elapsed().as_millis()
        );

        Ok(ResultSet { items })
    }
}

fn annotate(item: CandidateItem, verdicts: &HashMap<String, bool>) -> ResultItem {
    let displayable = verdicts.get(item.link.as_str()).copied();
    ResultItem { item, displayable }
}
