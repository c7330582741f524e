use url::Url;

use crate::data_models::CandidateItem;

/// Hosts known to refuse being framed. Matched as substrings of the host.
pub const DEFAULT_DENYLIST: &[&str] = &[
    // social
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "linkedin.com",
    "pinterest.com",
    "reddit.com",
    "tiktok.com",
    // video
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "netflix.com",
    "twitch.tv",
    // commerce
    "amazon.",
    "ebay.",
    "walmart.com",
    "etsy.com",
    "aliexpress.com",
    // misc
    "google.com",
    "github.com",
    "stackoverflow.com",
    "quora.com",
    "medium.com",
];

/// Cheap pre-filter that removes known non-embeddable hosts.
#[derive(Debug, Clone)]
pub struct StaticDomainFilter {
    denylist: Vec<String>,
}

impl Default for StaticDomainFilter {
    fn default() -> Self {
        StaticDomainFilter {
            denylist: DEFAULT_DENYLIST.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl StaticDomainFilter {
    pub fn new(denylist: Vec<String>) -> Self {
        StaticDomainFilter {
            denylist: denylist.into_iter().map(|d| d.to_lowercase()).collect(),
        }
    }

    /// The built-in list plus `extra` entries.
    pub fn with_extra(extra: &[String]) -> Self {
        let mut filter = Self::default();
        filter
            .denylist
            .extend(extra.iter().map(|d| d.to_lowercase()));
        filter
    }

    /// Fails closed: unparseable URLs and URLs without a host are rejected.
    pub fn is_statically_embeddable(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        !self.denylist.iter().any(|d| host.contains(d.as_str()))
    }

    /// Splits into `(eligible, denied)`, each in input order.
    pub fn partition(
        &self,
        candidates: Vec<CandidateItem>,
    ) -> (Vec<CandidateItem>, Vec<CandidateItem>) {
        candidates
            .into_iter()
            .partition(|c| self.is_statically_embeddable(&c.link))
    }
}

/// Checks `url` against the built-in denylist.
pub fn is_statically_embeddable(url: &str) -> bool {
    StaticDomainFilter::default().is_statically_embeddable(url)
}
