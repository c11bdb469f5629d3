//! The persistence coordinator
//!
//! `StateStore` owns the single canonical in-memory `State` and guarantees
//! durable, ordered application of mutations. Internally it is a mailbox
//! actor: a spawned task owns the state and the backend, and processes
//! commands strictly in FIFO order. That ordering point is what prevents
//! two near-simultaneous mutations from reading the same stale base and
//! clobbering one another.
//!
//! Mutations are optimistic: the new snapshot is published to observers
//! before the durable save runs. The publish step cannot fail; the save is
//! the only fallible step. A failed save is surfaced to the caller of that
//! specific mutation and never breaks the queue for subsequent ones.

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use crate::models::{ExportBundle, State};
use crate::storage::{PersistenceBackend, StorageError, StorageResult};

/// A pure state transformation queued for ordered application
pub type Updater = Box<dyn FnOnce(State) -> State + Send>;

/// Observable coordinator status
///
/// `state` is the canonical snapshot (optimistic: it may be ahead of the
/// last confirmed durable save). `init_error` records a startup failure
/// for UI consumption; when set, `is_ready` stays false.
#[derive(Debug, Clone, Default)]
pub struct StoreStatus {
    pub state: Option<State>,
    pub is_ready: bool,
    pub init_error: Option<String>,
}

enum Command {
    LoadInitial {
        reply: oneshot::Sender<StorageResult<State>>,
    },
    Mutate {
        updater: Updater,
        reply: oneshot::Sender<StorageResult<State>>,
    },
    Reset {
        reply: oneshot::Sender<StorageResult<State>>,
    },
    Export {
        reply: oneshot::Sender<StorageResult<ExportBundle>>,
    },
}

/// Handle to the persistence coordinator
///
/// Cheap to clone; every clone talks to the same canonical state. Tests
/// can spawn independent stores with independent backends.
#[derive(Clone)]
pub struct StateStore {
    command_tx: mpsc::Sender<Command>,
    status_rx: watch::Receiver<StoreStatus>,
}

impl StateStore {
    /// Spawn the coordinator task around a backend
    pub fn spawn(backend: impl PersistenceBackend + 'static) -> Self {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (status_tx, status_rx) = watch::channel(StoreStatus::default());

        let task = StoreTask {
            backend: Box::new(backend),
            canonical: None,
            is_ready: false,
            init_error: None,
            status_tx,
        };
        tokio::spawn(task.run(command_rx));

        Self {
            command_tx,
            status_rx,
        }
    }

    /// Current coordinator status (state, readiness, init error)
    pub fn status(&self) -> StoreStatus {
        self.status_rx.borrow().clone()
    }

    /// The canonical snapshot, if initialization has produced one
    pub fn state(&self) -> Option<State> {
        self.status_rx.borrow().state.clone()
    }

    /// Whether initialization completed successfully
    pub fn is_ready(&self) -> bool {
        self.status_rx.borrow().is_ready
    }

    /// Startup failure reason, if initialization failed
    pub fn init_error(&self) -> Option<String> {
        self.status_rx.borrow().init_error.clone()
    }

    /// Subscribe to status changes
    pub fn watch(&self) -> watch::Receiver<StoreStatus> {
        self.status_rx.clone()
    }

    /// Load the canonical state, initializing it on first call
    ///
    /// Idempotent: once canonical state exists it is returned immediately,
    /// and overlapping calls are serialized by the mailbox so the backend
    /// is only ever loaded once. When no snapshot is persisted, a default
    /// state is constructed, durably saved, and adopted.
    pub async fn load_initial_state(&self) -> StorageResult<State> {
        self.request(|reply| Command::LoadInitial { reply }).await
    }

    /// Apply a pure updater to the latest canonical snapshot
    ///
    /// The result is published immediately (callers observe it before the
    /// durable write confirms), then saved. All calls are totally ordered;
    /// an updater never observes a stale base from a still-in-flight prior
    /// mutation. A save failure rejects this call only; the optimistic
    /// in-memory value stands and the queue continues.
    pub async fn persist_and_set(
        &self,
        updater: impl FnOnce(State) -> State + Send + 'static,
    ) -> StorageResult<State> {
        self.request(|reply| Command::Mutate {
            updater: Box::new(updater),
            reply,
        })
        .await
    }

    /// Replace canonical state with freshly constructed defaults
    ///
    /// A hard overwrite: the default state is adopted and durably saved
    /// regardless of what the previous state was.
    pub async fn reset_system(&self) -> StorageResult<State> {
        self.request(|reply| Command::Reset { reply }).await
    }

    /// Export the persisted snapshot as a versioned bundle
    pub async fn export_data(&self) -> StorageResult<ExportBundle> {
        self.request(|reply| Command::Export { reply }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<StorageResult<T>>) -> Command,
    ) -> StorageResult<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(make(reply_tx))
            .await
            .map_err(|_| StorageError::unavailable("state store task terminated"))?;
        reply_rx
            .await
            .map_err(|_| StorageError::unavailable("state store task terminated"))?
    }
}

/// The actor side: owns the canonical state and the backend
struct StoreTask {
    backend: Box<dyn PersistenceBackend>,
    canonical: Option<State>,
    is_ready: bool,
    init_error: Option<String>,
    status_tx: watch::Sender<StoreStatus>,
}

impl StoreTask {
    async fn run(mut self, mut command_rx: mpsc::Receiver<Command>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                Command::LoadInitial { reply } => {
                    let _ = reply.send(self.load_initial());
                }
                Command::Mutate { updater, reply } => {
                    let _ = reply.send(self.mutate(updater));
                }
                Command::Reset { reply } => {
                    let _ = reply.send(self.reset());
                }
                Command::Export { reply } => {
                    let _ = reply.send(self.backend.export_data());
                }
            }
        }
        debug!("state store task shutting down");
    }

    fn publish(&self) {
        let _ = self.status_tx.send(StoreStatus {
            state: self.canonical.clone(),
            is_ready: self.is_ready,
            init_error: self.init_error.clone(),
        });
    }

    fn load_initial(&mut self) -> StorageResult<State> {
        if let Some(state) = &self.canonical {
            self.is_ready = true;
            self.publish();
            return Ok(state.clone());
        }

        match self.backend.load_state() {
            Ok(Some(state)) => {
                debug!("adopted persisted state snapshot");
                self.adopt(state.clone());
                Ok(state)
            }
            Ok(None) => {
                debug!("no persisted state, constructing defaults");
                let state = State::default();
                if let Err(e) = self.backend.save_state(&state) {
                    self.fail_init(&e);
                    return Err(e);
                }
                self.adopt(state.clone());
                Ok(state)
            }
            Err(e) => {
                self.fail_init(&e);
                Err(e)
            }
        }
    }

    fn adopt(&mut self, state: State) {
        self.canonical = Some(state);
        self.is_ready = true;
        self.init_error = None;
        self.publish();
    }

    fn fail_init(&mut self, error: &StorageError) {
        warn!("state initialization failed: {}", error);
        self.init_error = Some(error.to_string());
        self.is_ready = false;
        self.publish();
    }

    fn mutate(&mut self, updater: Updater) -> StorageResult<State> {
        let base = self.canonical.clone().unwrap_or_default();
        let next = updater(base);

        // Publish before saving; the publish step cannot fail.
        self.canonical = Some(next.clone());
        self.publish();

        match self.backend.save_state(&next) {
            Ok(()) => Ok(next),
            Err(e) => {
                warn!("durable save failed, keeping optimistic state: {}", e);
                Err(e)
            }
        }
    }

    fn reset(&mut self) -> StorageResult<State> {
        debug!("resetting to default state");
        let state = State::default();
        self.canonical = Some(state.clone());
        self.publish();

        self.backend.save_state(&state)?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::storage::MemoryBackend;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Backend whose saves can be made to fail at will
    struct FlakyBackend {
        inner: MemoryBackend,
        fail_saves: Arc<AtomicBool>,
        load_calls: Arc<AtomicUsize>,
    }

    impl FlakyBackend {
        fn new() -> (Self, Arc<AtomicBool>, Arc<AtomicUsize>) {
            let fail_saves = Arc::new(AtomicBool::new(false));
            let load_calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    inner: MemoryBackend::new(),
                    fail_saves: fail_saves.clone(),
                    load_calls: load_calls.clone(),
                },
                fail_saves,
                load_calls,
            )
        }
    }

    impl PersistenceBackend for FlakyBackend {
        fn load_state(&self) -> StorageResult<Option<State>> {
            self.load_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.load_state()
        }

        fn save_state(&self, state: &State) -> StorageResult<()> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(StorageError::write_failed("injected failure"));
            }
            self.inner.save_state(state)
        }

        fn export_data(&self) -> StorageResult<ExportBundle> {
            self.inner.export_data()
        }

        fn import_data(&self, bundle: &ExportBundle) -> StorageResult<()> {
            self.inner.import_data(bundle)
        }
    }

    /// Backend that always fails to load
    struct BrokenBackend;

    impl PersistenceBackend for BrokenBackend {
        fn load_state(&self) -> StorageResult<Option<State>> {
            Err(StorageError::unavailable("medium gone"))
        }
        fn save_state(&self, _state: &State) -> StorageResult<()> {
            Err(StorageError::unavailable("medium gone"))
        }
        fn export_data(&self) -> StorageResult<ExportBundle> {
            Err(StorageError::unavailable("medium gone"))
        }
        fn import_data(&self, _bundle: &ExportBundle) -> StorageResult<()> {
            Err(StorageError::unavailable("medium gone"))
        }
    }

    #[tokio::test]
    async fn test_first_load_saves_defaults() {
        let store = StateStore::spawn(MemoryBackend::new());
        assert!(!store.is_ready());

        let state = store.load_initial_state().await.unwrap();
        assert_eq!(state, State::default());
        assert!(store.is_ready());
        assert!(store.init_error().is_none());
    }

    #[tokio::test]
    async fn test_load_adopts_persisted_state() {
        let backend = MemoryBackend::new();
        let mut persisted = State::default();
        persisted
            .categories
            .push(Category::new(Some("Saved".to_string())));
        backend.save_state(&persisted).unwrap();

        let store = StateStore::spawn(backend);
        let state = store.load_initial_state().await.unwrap();
        assert_eq!(state, persisted);
    }

    #[tokio::test]
    async fn test_overlapping_loads_hit_backend_once() {
        let (backend, _, load_calls) = FlakyBackend::new();
        let store = StateStore::spawn(backend);

        let (a, b, c) = tokio::join!(
            store.load_initial_state(),
            store.load_initial_state(),
            store.load_initial_state()
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(load_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_init_failure_records_error_and_stays_not_ready() {
        let store = StateStore::spawn(BrokenBackend);
        let err = store.load_initial_state().await.unwrap_err();
        assert_eq!(err.code(), "storage-unavailable");
        assert!(!store.is_ready());
        assert!(store.init_error().unwrap().contains("medium gone"));
    }

    #[tokio::test]
    async fn test_mutations_are_totally_ordered() {
        let store = StateStore::spawn(MemoryBackend::new());
        store.load_initial_state().await.unwrap();

        // Fire a burst of mutations without awaiting in between; every
        // updater must see the published result of the previous one.
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .persist_and_set(move |mut state| {
                        state
                            .categories
                            .push(Category::new(Some(format!("cat-{}", i))));
                        state
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.state().unwrap().categories.len(), 20);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_optimistic_state_and_queue() {
        let (backend, fail_saves, _) = FlakyBackend::new();
        let store = StateStore::spawn(backend);
        store.load_initial_state().await.unwrap();

        fail_saves.store(true, Ordering::SeqCst);
        let err = store
            .persist_and_set(|mut state| {
                state.categories.push(Category::new(Some("lost?".to_string())));
                state
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "write-failed");

        // optimistic value stands despite the failed save
        assert_eq!(store.state().unwrap().categories.len(), 1);

        // the queue is not broken for subsequent mutations
        fail_saves.store(false, Ordering::SeqCst);
        let state = store
            .persist_and_set(|mut state| {
                state.categories.push(Category::new(Some("next".to_string())));
                state
            })
            .await
            .unwrap();
        assert_eq!(state.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_reset_replaces_state_with_defaults() {
        let store = StateStore::spawn(MemoryBackend::new());
        store.load_initial_state().await.unwrap();
        store
            .persist_and_set(|mut state| {
                state.categories.push(Category::new(None));
                state
            })
            .await
            .unwrap();

        let state = store.reset_system().await.unwrap();
        assert_eq!(state, State::default());
        assert_eq!(store.state().unwrap(), State::default());
    }

    #[tokio::test]
    async fn test_mutation_before_load_starts_from_defaults() {
        let store = StateStore::spawn(MemoryBackend::new());
        let state = store
            .persist_and_set(|mut state| {
                state.categories.push(Category::new(None));
                state
            })
            .await
            .unwrap();
        assert_eq!(state.categories.len(), 1);
    }
}
