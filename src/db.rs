use anyhow::{Context, Result};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database as MongoDatabase, bson::doc};
use tokio::sync::Mutex;

use crate::config::Config;

/// Collection names as constants for consistency
pub mod collections {
    pub const SESSIONS: &str = "sessions";
}

/// Connected database wrapper providing collection access
#[derive(Debug, Clone)]
pub struct Database {
    client: Client,
    db: MongoDatabase,
}

impl Database {
    /// Connect and ping. Fails if the server is unreachable.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client_options = ClientOptions::parse(uri)
            .await
            .context("Failed to parse MongoDB connection string")?;

        let client =
            Client::with_options(client_options).context("Failed to create MongoDB client")?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .context("Failed to connect to MongoDB")?;

        log::info!("Connected to MongoDB database: {}", db_name);

        let db = client.database(db_name);

        Ok(Self { client, db })
    }

    /// Get a typed collection by name
    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.db.collection(name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn name(&self) -> &str {
        self.db.name()
    }
}

/// Process-wide database handle that connects on first use.
///
/// `acquire` holds the init lock while connecting, so concurrent callers share
/// one connection attempt. A failed attempt leaves the handle empty and the
/// next `acquire` tries again. `release` drops the connection.
#[derive(Debug)]
pub struct LazyDatabase {
    uri: String,
    db_name: String,
    slot: Mutex<Option<Database>>,
}

impl LazyDatabase {
    pub fn new(uri: impl Into<String>, db_name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            db_name: db_name.into(),
            slot: Mutex::new(None),
        }
    }

    /// `None` when no MongoDB URI is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .mongo_uri
            .as_deref()
            .map(|uri| Self::new(uri, config.mongo_db_name.clone()))
    }

    pub async fn acquire(&self) -> Result<Database> {
        let mut slot = self.slot.lock().await;
        if let Some(db) = slot.as_ref() {
            return Ok(db.clone());
        }
        let db = Database::connect(&self.uri, &self.db_name).await?;
        *slot = Some(db.clone());
        Ok(db)
    }

    pub async fn release(&self) {
        let taken = self.slot.lock().await.take();
        if let Some(db) = taken {
            db.client.shutdown().await;
            log::info!("Released MongoDB connection to {}", self.db_name);
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}
