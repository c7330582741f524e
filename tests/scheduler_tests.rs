mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeProber, candidates};
use framesearch::data_models::ProbeVerdict;
use framesearch::scheduler::ProbeScheduler;

#[tokio::test]
async fn test_classify_caps_probes_and_passes_rest_through() {
    let items = candidates("site", 15);
    let prober = Arc::new(FakeProber::displaying([items[2].link.as_str()]));
    let scheduler = ProbeScheduler::new(prober.clone());

    let result = scheduler.classify(items.clone(), 10).await;

    assert_eq!(result.outcomes.len(), 10);
    assert_eq!(result.unprobed, items[10..].to_vec());
    assert_eq!(prober.calls(), 10);
    assert_eq!(result.displayable(), vec![items[2].clone()]);
}

#[tokio::test]
async fn test_classify_fewer_candidates_than_cap() {
    let items = candidates("site", 4);
    let scheduler = ProbeScheduler::new(Arc::new(FakeProber::default()));

    let result = scheduler.classify(items, 30).await;

    assert_eq!(result.outcomes.len(), 4);
    assert!(result.unprobed.is_empty());
}

#[tokio::test]
async fn test_classify_order_ignores_completion_order() {
    let items = candidates("site", 6);
    // Earlier candidates finish last.
    let mut prober = FakeProber::displaying(items.iter().map(|c| c.link.as_str()));
    for (i, item) in items.iter().enumerate() {
        prober = prober.with_delay(&item.link, Duration::from_millis(20 * (6 - i as u64)));
    }
    let scheduler = ProbeScheduler::new(Arc::new(prober));

    let result = scheduler.classify(items.clone(), 6).await;

    let order: Vec<_> = result.outcomes.iter().map(|o| o.item.clone()).collect();
    assert_eq!(order, items);
    assert_eq!(result.displayable(), items);
}

#[tokio::test]
async fn test_classify_runs_probes_concurrently() {
    let items = candidates("site", 10);
    let mut prober = FakeProber::default();
    for item in &items {
        prober = prober.with_delay(&item.link, Duration::from_millis(200));
    }
    let scheduler = ProbeScheduler::new(Arc::new(prober));

    let start = std::time::Instant::now();
    let result = scheduler.classify(items, 10).await;

    assert_eq!(result.outcomes.len(), 10);
    assert!(start.elapsed() < Duration::from_millis(1_000));
}

#[tokio::test]
async fn test_failures_do_not_affect_siblings() {
    let items = candidates("site", 5);
    let prober = FakeProber::displaying([items[0].link.as_str(), items[4].link.as_str()])
        .with_verdict(&items[1].link, ProbeVerdict::TimedOut)
        .with_verdict(&items[2].link, ProbeVerdict::NetworkFailure)
        .with_verdict(&items[3].link, ProbeVerdict::HttpError);
    let scheduler = ProbeScheduler::new(Arc::new(prober));

    let result = scheduler.classify(items.clone(), 5).await;

    let verdicts: Vec<_> = result.outcomes.iter().map(|o| o.verdict).collect();
    assert_eq!(
        verdicts,
        vec![
            ProbeVerdict::Displayable,
            ProbeVerdict::TimedOut,
            ProbeVerdict::NetworkFailure,
            ProbeVerdict::HttpError,
            ProbeVerdict::Displayable,
        ]
    );
    assert_eq!(result.displayable(), vec![items[0].clone(), items[4].clone()]);
}
