//! Per-process lazy resource registry.
//!
//! Handlers depend on up to three expensive resources: the template
//! renderer, the database pool, and the search client. None of them is
//! built at startup; the first handler that declares a resource triggers
//! its construction via [`Resources::ensure`], and every later call is a
//! no-op. [`Resources::templates`] and friends return the built resource,
//! failing with [`ResourceError::Uninitialized`] when `ensure` was never
//! run for that kind — a programming error in the route table, not a user
//! fault.
//!
//! Connection-per-worker is delegated to the sqlx pool; the registry itself
//! is shared and initialize-once (`tokio::sync::OnceCell`).

use anyhow::Result;
use sqlx::SqlitePool;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::db;
use crate::render::Renderer;
use crate::solr::{SearchBackend, SolrClient};

/// The kinds of lazily-built resources a handler can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Templates,
    Database,
    Search,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Templates => "templates",
            ResourceKind::Database => "database",
            ResourceKind::Search => "search",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("{0} resource has not been initialised")]
    Uninitialized(ResourceKind),
}

pub struct Resources {
    config: Arc<Config>,
    templates: OnceCell<Renderer>,
    database: OnceCell<SqlitePool>,
    search: OnceCell<Arc<dyn SearchBackend>>,
}

impl Resources {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            templates: OnceCell::new(),
            database: OnceCell::new(),
            search: OnceCell::new(),
        }
    }

    /// Registry with a pre-built search backend, bypassing the Solr client.
    /// Used by tests to substitute a recording fake.
    pub fn with_search_backend(config: Arc<Config>, backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            config,
            templates: OnceCell::new(),
            database: OnceCell::new(),
            search: OnceCell::new_with(Some(backend)),
        }
    }

    /// Idempotently initialises every listed resource kind. Calling this N
    /// times builds each underlying resource exactly once.
    pub async fn ensure(&self, kinds: &[ResourceKind]) -> Result<()> {
        for kind in kinds {
            match kind {
                ResourceKind::Templates => self.ensure_templates().await?,
                ResourceKind::Database => self.ensure_database().await?,
                ResourceKind::Search => self.ensure_search().await?,
            }
        }
        Ok(())
    }

    pub async fn ensure_templates(&self) -> Result<()> {
        self.templates
            .get_or_try_init(|| async { Renderer::new(&self.config) })
            .await?;
        Ok(())
    }

    pub async fn ensure_database(&self) -> Result<()> {
        self.database
            .get_or_try_init(|| async { db::connect(&self.config).await })
            .await?;
        Ok(())
    }

    pub async fn ensure_search(&self) -> Result<()> {
        self.search
            .get_or_try_init(|| async {
                let client = SolrClient::new(&self.config.search)?;
                Ok::<_, anyhow::Error>(Arc::new(client) as Arc<dyn SearchBackend>)
            })
            .await?;
        Ok(())
    }

    pub fn templates(&self) -> Result<&Renderer, ResourceError> {
        self.templates
            .get()
            .ok_or(ResourceError::Uninitialized(ResourceKind::Templates))
    }

    pub fn database(&self) -> Result<&SqlitePool, ResourceError> {
        self.database
            .get()
            .ok_or(ResourceError::Uninitialized(ResourceKind::Database))
    }

    pub fn search(&self) -> Result<&Arc<dyn SearchBackend>, ResourceError> {
        self.search
            .get()
            .ok_or(ResourceError::Uninitialized(ResourceKind::Search))
    }
}
