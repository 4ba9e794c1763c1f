//! Processing configuration.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::Conversion;
//! use raster_ops::ProcessorConfig;
//!
//! let config = ProcessorConfig::builder()
//!     .threads(4)
//!     .conversion(Conversion::Srgb)
//!     .memory_limit_mb(256)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.pool.budget(), Some(256 * 1024 * 1024));
//! assert_eq!(config.thread_pool().map(|p| p.current_num_threads()), Some(4));
//! ```

use crate::parallel::Parallelism;
use crate::{OpsError, OpsResult};
use raster_core::{BufferPool, Conversion};
use rayon::ThreadPool;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Configuration
// ============================================================================

/// Settings shared by processing calls.
///
/// Cloning is cheap; clones share the same [`BufferPool`], so a budget set
/// on one applies to all of them. They also share the worker threads that
/// [`ProcessorConfigBuilder::build`] starts for [`Parallelism::Threads`].
#[derive(Debug, Clone, Default)]
pub struct ProcessorConfig {
    /// Worker layout for row bands.
    pub parallelism: Parallelism,
    /// How stored components map to the working vectors.
    pub conversion: Conversion,
    /// Destination and scratch memory accounting.
    pub pool: Arc<BufferPool>,
    pub(crate) workers: Option<Arc<ThreadPool>>,
}

impl ProcessorConfig {
    /// Starts a builder with default settings.
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::new()
    }

    /// Single-threaded configuration with an unlimited pool.
    pub fn sequential() -> Self {
        Self {
            parallelism: Parallelism::Sequential,
            ..Self::default()
        }
    }

    /// Worker threads started by the builder, if any.
    pub fn thread_pool(&self) -> Option<&ThreadPool> {
        self.workers.as_deref()
    }

    /// Checks that the settings can be run.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidParameter`] for `Threads(0)`.
    pub fn validate(&self) -> OpsResult<()> {
        if self.parallelism == Parallelism::Threads(0) {
            return Err(OpsError::InvalidParameter("thread count must be at least 1".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ProcessorConfig`].
#[derive(Debug, Clone, Default)]
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the worker layout.
    pub fn parallelism(mut self, parallelism: Parallelism) -> Self {
        self.config.parallelism = parallelism;
        self
    }

    /// Runs on a dedicated pool of `n` threads.
    pub fn threads(mut self, n: usize) -> Self {
        self.config.parallelism = Parallelism::Threads(n);
        self
    }

    /// Sets the conversion context.
    pub fn conversion(mut self, conversion: Conversion) -> Self {
        self.config.conversion = conversion;
        self
    }

    /// Shares an existing buffer pool.
    pub fn pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.config.pool = pool;
        self
    }

    /// Uses a fresh pool limited to `bytes`.
    pub fn memory_limit(mut self, bytes: usize) -> Self {
        self.config.pool = Arc::new(BufferPool::with_budget(bytes));
        self
    }

    /// Uses a fresh pool limited to `mb` megabytes.
    pub fn memory_limit_mb(self, mb: usize) -> Self {
        self.memory_limit(mb.saturating_mul(1024 * 1024))
    }

    /// Builds the configuration.
    ///
    /// For [`Parallelism::Threads`] this starts the worker threads once;
    /// every call made with the configuration (or its clones) reuses them.
    ///
    /// # Errors
    ///
    /// See [`ProcessorConfig::validate`]. Returns [`OpsError::ThreadPool`]
    /// if the worker threads cannot be started.
    pub fn build(mut self) -> OpsResult<ProcessorConfig> {
        self.config.validate()?;
        if let Parallelism::Threads(n) = self.config.parallelism {
            let workers = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .thread_name(|i| format!("raster-worker-{i}"))
                .build()?;
            debug!(threads = n, "worker pool started");
            self.config.workers = Some(Arc::new(workers));
        }
        Ok(self.config)
    }
}
