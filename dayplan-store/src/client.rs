//! MongoDB connection management.
//!
//! The store is constructed once at process start and handed to request
//! handlers through shared state; the driver client is internally pooled, so
//! clones are cheap per-request handles.

use std::sync::Arc;
use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, DatabaseOptions, ReadPreference, SelectionCriteria};
use mongodb::{Client, Collection, Database};
use once_cell::sync::OnceCell;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::watch::OpWatch;

/// Handle to the MongoDB database used by all facade operations.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    client: Client,
    db: Database,
    export_db: OnceCell<Database>,
    config: StoreConfig,
}

impl Store {
    /// Connect to MongoDB and verify the connection with a ping.
    ///
    /// Startup connection failure is unrecoverable for the process; callers
    /// are expected to propagate the error and exit.
    pub async fn connect(config: StoreConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.max_pool_size = Some(config.pool_size);
        options.min_pool_size = Some(config.min_pool_size);
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
        options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));

        let client = Client::with_options(options)?;
        client.database("admin").run_command(doc! { "ping": 1 }).await?;
        tracing::info!(database = %config.database_name, "connected to MongoDB");

        let db = client.database(&config.database_name);
        Ok(Self {
            inner: Arc::new(StoreInner { client, db, export_db: OnceCell::new(), config }),
        })
    }

    pub fn client(&self) -> &Client {
        &self.inner.client
    }

    pub fn database(&self) -> &Database {
        &self.inner.db
    }

    /// Database handle for read-heavy batch use.
    ///
    /// Initialized lazily and independently from the primary handle; reads
    /// may be served by a secondary.
    pub fn export_database(&self) -> &Database {
        self.inner.export_db.get_or_init(|| {
            let options = DatabaseOptions::builder()
                .selection_criteria(SelectionCriteria::ReadPreference(
                    ReadPreference::SecondaryPreferred { options: Default::default() },
                ))
                .build();
            self.inner
                .client
                .database_with_options(&self.inner.config.database_name, options)
        })
    }

    /// Get a typed collection from the primary database handle.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.inner.db.collection(name)
    }

    /// Get a typed collection from the export handle.
    pub fn export_collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.export_database().collection(name)
    }

    pub(crate) fn watch(&self, collection: &str, operation: &'static str) -> OpWatch {
        OpWatch::new(collection, operation, self.inner.config.slow_op_threshold())
    }
}
