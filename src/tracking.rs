use anyhow::{Context, Result};
use async_trait::async_trait;
use mongodb::bson::{self, DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::{LazyDatabase, collections};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchEvent {
    pub query: String,
    #[serde(default)]
    pub filter_embeddable: bool,
    /// Milliseconds since the epoch; stamped on record when missing.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub link: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionEvents {
    #[serde(default)]
    pub searches: Vec<SearchEvent>,
    #[serde(default)]
    pub clicks: Vec<ClickEvent>,
}

impl SessionEvents {
    pub fn is_empty(&self) -> bool {
        self.searches.is_empty() && self.clicks.is_empty()
    }

    fn stamped(mut self, now_ms: i64) -> Self {
        for s in &mut self.searches {
            s.timestamp.get_or_insert(now_ms);
        }
        for c in &mut self.clicks {
            c.timestamp.get_or_insert(now_ms);
        }
        self
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn record_events(&self, session_id: &str, events: SessionEvents) -> Result<()>;
}

/// Records events without making the caller wait. Errors are only logged.
pub fn spawn_record(sink: Arc<dyn EventSink>, session_id: String, events: SessionEvents) {
    if events.is_empty() {
        return;
    }
    tokio::spawn(async move {
        if let Err(e) = sink.record_events(&session_id, events).await {
            tracing::warn!("failed to record events for session {session_id}: {e:#}");
        }
    });
}

/// Builds the upsert for one session document. Arrays use set semantics so
/// replaying the same events does not duplicate them.
pub fn session_update(events: SessionEvents, now: DateTime) -> Result<Document> {
    let events = events.stamped(now.timestamp_millis());
    let searches = bson::to_bson(&events.searches).context("Failed to encode search events")?;
    let clicks = bson::to_bson(&events.clicks).context("Failed to encode click events")?;

    Ok(doc! {
        "$addToSet": {
            "searches": { "$each": searches },
            "clicks": { "$each": clicks },
        },
        "$setOnInsert": { "created_at": now },
        "$set": { "updated_at": now },
    })
}

pub struct MongoEventSink {
    db: Arc<LazyDatabase>,
}

impl MongoEventSink {
    pub fn new(db: Arc<LazyDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventSink for MongoEventSink {
    async fn record_events(&self, session_id: &str, events: SessionEvents) -> Result<()> {
        let db = self.db.acquire().await?;
        let update = session_update(events, DateTime::now())?;
        let result = db
            .collection::<Document>(collections::SESSIONS)
            .update_one(doc! { "_id": session_id }, update)
            .upsert(true)
            .await;

        if let Err(e) = result {
            // Drop the cached client so the next call reconnects.
            self.db.release().await;
            return Err(e).context("Failed to upsert session events");
        }
        Ok(())
    }
}

/// Used when tracking is not configured.
pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {
    async fn record_events(&self, session_id: &str, events: SessionEvents) -> Result<()> {
        tracing::debug!(
            "tracking disabled, dropping {} searches and {} clicks for {session_id}",
            events.searches.len(),
            events.clicks.len()
        );
        Ok(())
    }
}
