//! The repository facade.
//!
//! A [`Repository`] wires the schema registry, journal, index engine, lock
//! provider, and dispatcher into one lifecycle. Everything is injected
//! through [`RepositoryBuilder`]; there is no ambient state. The lifecycle is
//! a one-way state machine, Idle to Running to Stopped, and commands are
//! accepted only while Running.

use crate::{RepositoryError, RepositoryResult};
use chronicle_dispatch::{
    Command, Completion, Dispatcher, DispatcherConfig, LocalLockProvider, LockProvider,
    Subscription,
};
use chronicle_index::{CompositeIndexEngine, IndexEngine, MemoryIndexEngine};
use chronicle_journal::{CommandTerminated, Journal, MemoryJournal};
use chronicle_layout::{LayoutOptions, SchemaRegistry, Schematic};
use std::sync::{Arc, Mutex};
use tracing::info;

type JournalFactory = Box<dyn FnOnce(Arc<SchemaRegistry>) -> Arc<dyn Journal>>;

/// Constructor injection for a [`Repository`].
///
/// Registers the command and event types up front, then chooses backends;
/// every component has an in-memory default. The terminal event type is
/// registered automatically.
pub struct RepositoryBuilder {
    registry: SchemaRegistry,
    journal: Option<JournalFactory>,
    engines: Vec<Arc<dyn IndexEngine>>,
    locks: Option<Arc<dyn LockProvider>>,
    config: DispatcherConfig,
}

impl RepositoryBuilder {
    /// A builder with default layout options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(LayoutOptions::default())
    }

    /// A builder with explicit layout options.
    #[must_use]
    pub fn with_options(options: LayoutOptions) -> Self {
        Self {
            registry: SchemaRegistry::with_options(options),
            journal: None,
            engines: Vec::new(),
            locks: None,
            config: DispatcherConfig::default(),
        }
    }

    /// Registers a command type.
    pub fn command<T: Schematic>(mut self) -> RepositoryResult<Self> {
        self.registry.register_command::<T>()?;
        Ok(self)
    }

    /// Registers an event type.
    pub fn event<T: Schematic>(mut self) -> RepositoryResult<Self> {
        self.registry.register_event::<T>()?;
        Ok(self)
    }

    /// Chooses the journal backend. The factory receives the completed
    /// registry. Defaults to [`MemoryJournal`].
    #[must_use]
    pub fn journal(
        mut self,
        factory: impl FnOnce(Arc<SchemaRegistry>) -> Arc<dyn Journal> + 'static,
    ) -> Self {
        self.journal = Some(Box::new(factory));
        self
    }

    /// Appends an index engine. One engine is used directly; several are
    /// wrapped in a [`CompositeIndexEngine`] consulted in append order.
    /// Defaults to [`MemoryIndexEngine`].
    #[must_use]
    pub fn index_engine(mut self, engine: Arc<dyn IndexEngine>) -> Self {
        self.engines.push(engine);
        self
    }

    /// Chooses the lock provider. Defaults to [`LocalLockProvider`].
    #[must_use]
    pub fn lock_provider(mut self, locks: Arc<dyn LockProvider>) -> Self {
        self.locks = Some(locks);
        self
    }

    /// Sizes the dispatcher.
    #[must_use]
    pub fn dispatcher(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Assembles an idle repository.
    pub fn build(mut self) -> RepositoryResult<Repository> {
        if self
            .registry
            .erased_by_name(CommandTerminated::TYPE_NAME)
            .is_none()
        {
            self.registry.register_event::<CommandTerminated>()?;
        }
        let registry = Arc::new(self.registry);
        let journal = match self.journal {
            Some(factory) => factory(registry.clone()),
            None => Arc::new(MemoryJournal::new(registry.clone())),
        };
        let index: Arc<dyn IndexEngine> = match self.engines.len() {
            0 => Arc::new(MemoryIndexEngine::new()),
            1 => self.engines.remove(0),
            _ => Arc::new(CompositeIndexEngine::new(self.engines)),
        };
        let locks = self
            .locks
            .unwrap_or_else(|| Arc::new(LocalLockProvider::new()));
        info!(schemas = registry.len(), "repository built");
        Ok(Repository {
            registry,
            journal,
            index,
            locks,
            config: self.config,
            lifecycle: Mutex::new(Lifecycle::Idle),
        })
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

enum Lifecycle {
    Idle,
    Running(Arc<Dispatcher>),
    Stopped,
}

/// The assembled engine: registry, journal, indices, locks, dispatcher.
pub struct Repository {
    registry: Arc<SchemaRegistry>,
    journal: Arc<dyn Journal>,
    index: Arc<dyn IndexEngine>,
    locks: Arc<dyn LockProvider>,
    config: DispatcherConfig,
    lifecycle: Mutex<Lifecycle>,
}

impl Repository {
    /// Starts the partition workers. Valid only once, from Idle.
    pub fn start(&self) -> RepositoryResult<()> {
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(|e| e.into_inner());
        match &*lifecycle {
            Lifecycle::Idle => {
                let dispatcher = Dispatcher::new(
                    self.config.clone(),
                    self.journal.clone(),
                    self.index.clone(),
                    self.locks.clone(),
                )?;
                *lifecycle = Lifecycle::Running(Arc::new(dispatcher));
                info!("repository running");
                Ok(())
            }
            Lifecycle::Running(_) => Err(RepositoryError::AlreadyRunning),
            Lifecycle::Stopped => Err(RepositoryError::Stopped),
        }
    }

    /// Stops the workers after draining queued commands. Idempotent; a
    /// stopped repository cannot be restarted.
    pub fn stop(&self) {
        let previous = {
            let mut lifecycle = self.lifecycle.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *lifecycle, Lifecycle::Stopped)
        };
        if let Lifecycle::Running(dispatcher) = previous {
            // A submitter may still hold a clone while it finishes its queue
            // send; in that case the last clone shuts the workers down.
            if let Some(mut dispatcher) = Arc::into_inner(dispatcher) {
                dispatcher.shutdown();
            }
        }
        info!("repository stopped");
    }

    /// Submits a command for partitioned execution.
    ///
    /// The lifecycle guard is released before the command is queued, so a
    /// full partition queue blocks only this submitter.
    pub fn submit<C: Command>(&self, command: C) -> RepositoryResult<Completion<C::Output>> {
        Ok(self.dispatcher()?.submit(command))
    }

    /// Registers a post-commit subscriber. Valid only while running.
    pub fn subscribe(&self, subscription: Subscription) -> RepositoryResult<()> {
        self.dispatcher()?.subscribe(subscription);
        Ok(())
    }

    fn dispatcher(&self) -> RepositoryResult<Arc<Dispatcher>> {
        let lifecycle = self.lifecycle.lock().unwrap_or_else(|e| e.into_inner());
        match &*lifecycle {
            Lifecycle::Running(dispatcher) => Ok(dispatcher.clone()),
            Lifecycle::Idle => Err(RepositoryError::NotStarted),
            Lifecycle::Stopped => Err(RepositoryError::Stopped),
        }
    }

    /// True while commands are being accepted.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(
            &*self.lifecycle.lock().unwrap_or_else(|e| e.into_inner()),
            Lifecycle::Running(_)
        )
    }

    /// The schema registry every component encodes through.
    #[must_use]
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// The journal backend.
    #[must_use]
    pub fn journal(&self) -> &Arc<dyn Journal> {
        &self.journal
    }

    /// The index engine.
    #[must_use]
    pub fn index(&self) -> &Arc<dyn IndexEngine> {
        &self.index
    }

    /// The lock provider.
    #[must_use]
    pub fn locks(&self) -> &Arc<dyn LockProvider> {
        &self.locks
    }
}

impl Drop for Repository {
    fn drop(&mut self) {
        self.stop();
    }
}
