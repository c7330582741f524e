#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use framesearch::data_models::{CandidateItem, ProbeVerdict};
use framesearch::error::UpstreamError;
use framesearch::probe::Prober;
use framesearch::upstream::{SearchProvider, UpstreamPage};

/// Serve `app` on an ephemeral local port.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn candidates(prefix: &str, n: usize) -> Vec<CandidateItem> {
    (0..n)
        .map(|i| {
            CandidateItem::new(
                format!("https://{prefix}{i}.example/"),
                format!("{prefix} {i}"),
                format!("snippet {i}"),
            )
        })
        .collect()
}

pub enum Scripted {
    Page(UpstreamPage),
    Quota,
    Status(u16),
}

/// Provider that replays a fixed script, one entry per call.
pub struct ScriptedProvider {
    script: Vec<Scripted>,
    pub offsets: Mutex<Vec<u32>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script,
            offsets: Mutex::new(Vec::new()),
        }
    }

    /// Splits `items` into pages of ten, chaining next offsets.
    pub fn paged(items: Vec<CandidateItem>) -> Self {
        let chunks: Vec<Vec<CandidateItem>> = items.chunks(10).map(|c| c.to_vec()).collect();
        let last = chunks.len().saturating_sub(1);
        let script = chunks
            .into_iter()
            .enumerate()
            .map(|(i, items)| {
                Scripted::Page(UpstreamPage {
                    items,
                    next_offset: (i < last).then(|| 1 + 10 * (i as u32 + 1)),
                })
            })
            .collect();
        Self::new(script)
    }

    pub fn calls(&self) -> usize {
        self.offsets.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchProvider for ScriptedProvider {
    async fn fetch_page(
        &self,
        _query: &str,
        offset: u32,
        _page_size: u32,
    ) -> Result<UpstreamPage, UpstreamError> {
        let call = {
            let mut offsets = self.offsets.lock().unwrap();
            offsets.push(offset);
            offsets.len() - 1
        };
        match self.script.get(call) {
            Some(Scripted::Page(page)) => Ok(page.clone()),
            Some(Scripted::Quota) => Err(UpstreamError::QuotaExceeded {
                status: 429,
                body: "rate limited".to_string(),
            }),
            Some(Scripted::Status(status)) => Err(UpstreamError::Status {
                status: *status,
                body: String::new(),
            }),
            None => Ok(UpstreamPage::default()),
        }
    }
}

/// Prober with canned verdicts and optional per-link delays.
#[derive(Default)]
pub struct FakeProber {
    displayable: HashSet<String>,
    verdicts: HashMap<String, ProbeVerdict>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl FakeProber {
    pub fn displaying<'a>(links: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            displayable: links.into_iter().map(str::to_string).collect(),
            ..Default::default()
        }
    }

    pub fn with_verdict(mut self, link: &str, verdict: ProbeVerdict) -> Self {
        self.verdicts.insert(link.to_string(), verdict);
        self
    }

    pub fn with_delay(mut self, link: &str, delay: Duration) -> Self {
        self.delays.insert(link.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn probe(&self, url: &str) -> ProbeVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(verdict) = self.verdicts.get(url) {
            return *verdict;
        }
        if self.displayable.contains(url) {
            ProbeVerdict::Displayable
        } else {
            ProbeVerdict::BlockedByHeader
        }
    }
}
