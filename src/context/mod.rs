pub mod config;
pub mod manager;

pub use config::ContextConfig;
pub use manager::EntityManager;

use crate::active::BoundEntity;
use crate::core::{OrmError, Result};
use crate::query::QueryBuilder;
use crate::registrar;
use crate::schema::{EntityMetadata, MetadataBuilder, MetadataRegistry, MetadataValidator};
use crate::storage::StorageEngine;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Initialized,
    ShutDown,
}

pub(crate) struct ContextInner {
    pub(crate) config: ContextConfig,
    state: RwLock<Lifecycle>,
    pub(crate) registry: RwLock<MetadataRegistry>,
    pub(crate) engine: StorageEngine,
    pub(crate) builder: MetadataBuilder,
    pub(crate) validator: MetadataValidator,
    /// Entity names bound for active-record use.
    pub(crate) bound: RwLock<HashSet<String>>,
    /// Transactions run one at a time.
    tx_lock: Mutex<()>,
}

/// The long-lived persistence context: owns the storage engine, the metadata
/// registry, and transaction scoping.
///
/// Explicitly constructed and passed to whatever needs it; there is no global
/// instance. Lifecycle: construct, [`initialize`](Self::initialize), use,
/// [`shutdown`](Self::shutdown). Cloning is cheap and shares the same context.
#[derive(Clone)]
pub struct DataContext {
    inner: Arc<ContextInner>,
}

impl DataContext {
    pub fn new(config: ContextConfig) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                config,
                state: RwLock::new(Lifecycle::Created),
                registry: RwLock::new(MetadataRegistry::new()),
                engine: StorageEngine::new(),
                builder: MetadataBuilder::new(),
                validator: MetadataValidator::new(),
                bound: RwLock::new(HashSet::new()),
                tx_lock: Mutex::new(()),
            }),
        }
    }

    /// Opens the connection, resolves and validates the configured
    /// descriptors, and synchronizes storage when the config asks for it.
    pub async fn initialize(&self) -> Result<()> {
        {
            let mut state = self.inner.state.write().await;
            match *state {
                Lifecycle::Created => *state = Lifecycle::Initialized,
                Lifecycle::Initialized => return Err(OrmError::AlreadyInitialized),
                Lifecycle::ShutDown => return Err(OrmError::NotInitialized),
            }
        }
        info!(
            host = %self.inner.config.host,
            port = self.inner.config.port,
            database = %self.inner.config.database,
            "persistence context initialized"
        );

        let initial = self.inner.config.entities.clone();
        if !initial.is_empty() {
            registrar::apply_batch(self, initial).await?;
        }
        if self.inner.config.synchronize {
            self.synchronize().await?;
        }
        Ok(())
    }

    /// Reconciles the live storage with the full registry: missing tables are
    /// created, missing columns added. Views have no backing storage.
    pub async fn synchronize(&self) -> Result<()> {
        self.ensure_initialized().await?;
        let registry = self.inner.registry.read().await;
        for metadata in registry.entries() {
            self.inner.engine.sync_table(metadata).await?;
        }
        debug!(entities = registry.len(), "schema synchronized");
        Ok(())
    }

    pub async fn shutdown(&self) {
        *self.inner.state.write().await = Lifecycle::ShutDown;
        info!("persistence context shut down");
    }

    pub async fn has_metadata(&self, entity: &str) -> bool {
        self.inner.registry.read().await.has(entity)
    }

    pub async fn metadata(&self, entity: &str) -> Result<EntityMetadata> {
        self.inner.registry.read().await.require(entity).cloned()
    }

    pub fn manager(&self) -> EntityManager {
        EntityManager::new(self.clone())
    }

    pub fn create_query_builder(&self) -> QueryBuilder {
        QueryBuilder::new(self.clone())
    }

    /// Returns the active-record handle for a self-managing entity, or `None`
    /// when the entity never opted into the capability (or is unregistered).
    pub async fn bound(&self, entity: &str) -> Option<BoundEntity> {
        if self.inner.bound.read().await.contains(entity) {
            Some(BoundEntity::new(self.clone(), entity))
        } else {
            None
        }
    }

    /// Runs `work` as a unit of work: data changes are kept on `Ok` and rolled
    /// back to the pre-transaction snapshot on `Err`. The error is returned
    /// unchanged. Metadata registration is not transactional.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynorm::prelude::*;
    ///
    /// # tokio_test::block_on(async {
    /// let ctx = DataContext::new(ContextConfig::new("root", "root").synchronize(true));
    /// ctx.initialize().await?;
    /// let log = EntityDescriptor::builder("log")
    ///     .column("content", DataType::Text)
    ///     .build();
    /// register_entities(&ctx, log).await?;
    ///
    /// ctx.transaction(|manager| async move {
    ///     let mut entry = manager.create("log").await?;
    ///     entry.insert("content".into(), Value::text("hello"));
    ///     manager.save("log", entry).await?;
    ///     Ok(())
    /// })
    /// .await?;
    ///
    /// assert_eq!(ctx.manager().find("log", None).await?.len(), 1);
    /// # Ok::<(), OrmError>(())
    /// # }).unwrap();
    /// ```
    pub async fn transaction<T, F, Fut>(&self, work: F) -> Result<T>
    where
        F: FnOnce(EntityManager) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.ensure_initialized().await?;
        let _guard = self.inner.tx_lock.lock().await;
        let snapshot = self.inner.engine.snapshot().await;
        debug!("transaction started");
        match work(self.manager()).await {
            Ok(value) => {
                debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                self.inner.engine.restore(snapshot).await;
                warn!(error = %err, "transaction rolled back");
                Err(err)
            }
        }
    }

    pub(crate) async fn ensure_initialized(&self) -> Result<()> {
        match *self.inner.state.read().await {
            Lifecycle::Initialized => Ok(()),
            _ => Err(OrmError::NotInitialized),
        }
    }

    pub(crate) fn inner(&self) -> &ContextInner {
        &self.inner
    }
}
