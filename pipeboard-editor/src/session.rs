//! Editor session
//!
//! Connects the [`Store`] to the backend. A load fetches the pipeline and the
//! data-source list concurrently and applies both or neither. Loads are
//! sequenced: starting a new load cancels any load still in flight, and the
//! store refuses results from anything but the newest request, so a slow
//! response for an earlier pipeline can never overwrite a later one.

use pipeboard_client::PipelineApi;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::{SessionError, StoreError};
use crate::store::{LoadTicket, Store};

/// How a load request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result was applied to the store
    Applied,
    /// A newer load was started; nothing was applied
    Superseded,
}

struct Inner {
    api: Arc<dyn PipelineApi>,
    store: Mutex<Store>,
    /// Sequence number of the newest load ticket
    latest_load: watch::Sender<u64>,
}

/// Shared handle to the editor state and its backend
///
/// Cloning is cheap; all clones see the same store.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    /// Creates a session with an empty store
    pub fn new(api: Arc<dyn PipelineApi>) -> Self {
        let (latest_load, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                api,
                store: Mutex::new(Store::new()),
                latest_load,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.inner
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with read access to the store
    pub fn read<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        f(&*self.lock())
    }

    /// Run `f` with write access to the store
    pub fn update<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
        f(&mut *self.lock())
    }

    // =============================================================================
    // Loading
    // =============================================================================

    /// Issue a load request for `pipeline_id`
    ///
    /// The request is registered immediately, superseding any earlier one,
    /// but nothing is fetched until [`LoadRequest::run`] is awaited.
    pub fn begin_load(&self, pipeline_id: impl Into<String>) -> LoadRequest {
        let pipeline_id = pipeline_id.into();

        let mut store = self.lock();
        let ticket = store.start_load(&pipeline_id);
        self.inner.latest_load.send_replace(ticket.sequence());
        let latest = self.inner.latest_load.subscribe();
        drop(store);

        LoadRequest {
            session: self.clone(),
            ticket,
            latest,
        }
    }

    /// Load `pipeline_id` and the data-source list
    pub async fn load(&self, pipeline_id: impl Into<String>) -> Result<LoadOutcome, SessionError> {
        self.begin_load(pipeline_id).run().await
    }

    // =============================================================================
    // Saving
    // =============================================================================

    /// Write the whole in-memory pipeline back to the backend
    ///
    /// The document is sent as an unconditional overwrite.
    pub async fn save(&self) -> Result<(), SessionError> {
        let (pipeline_id, pipeline) = self.read(Store::snapshot)?;

        info!("Saving pipeline {}", pipeline_id);
        match self.inner.api.update_pipeline(&pipeline_id, &pipeline).await {
            Ok(()) => {
                self.update(Store::record_save_succeeded);
                info!("Pipeline {} saved", pipeline_id);
                Ok(())
            }
            Err(e) => {
                error!("Error saving pipeline {}: {}", pipeline_id, e);
                self.update(Store::record_save_failed);
                Err(SessionError::Save(e))
            }
        }
    }
}

/// A registered, not yet executed, load
pub struct LoadRequest {
    session: Session,
    ticket: LoadTicket,
    latest: watch::Receiver<u64>,
}

impl LoadRequest {
    pub fn ticket(&self) -> &LoadTicket {
        &self.ticket
    }

    /// Fetch and apply the pipeline and data sources
    ///
    /// Returns [`LoadOutcome::Superseded`] without touching the store if a
    /// newer load was issued before this one finished; in-flight requests are
    /// dropped as soon as that happens.
    pub async fn run(self) -> Result<LoadOutcome, SessionError> {
        let Self {
            session,
            ticket,
            mut latest,
        } = self;
        let sequence = ticket.sequence();

        if *latest.borrow_and_update() != sequence {
            debug!("Load #{} superseded before it started", sequence);
            return Ok(LoadOutcome::Superseded);
        }

        let api = Arc::clone(&session.inner.api);
        let pipeline_id = ticket.pipeline_id();
        let fetch = async {
            tokio::try_join!(api.get_pipeline(pipeline_id), api.list_data_sources())
        };

        let fetched = tokio::select! {
            fetched = fetch => fetched,
            _ = wait_until_superseded(&mut latest, sequence) => {
                debug!("Load #{} for pipeline {} cancelled", sequence, pipeline_id);
                return Ok(LoadOutcome::Superseded);
            }
        };

        match fetched {
            Ok((pipeline, data_sources)) => {
                match session.update(|store| store.finish_load(&ticket, pipeline, data_sources)) {
                    Ok(()) => Ok(LoadOutcome::Applied),
                    Err(StoreError::StaleLoad { .. }) => Ok(LoadOutcome::Superseded),
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => {
                error!("Error fetching pipeline data for {}: {}", pipeline_id, e);
                match session.update(|store| store.fail_load(&ticket)) {
                    Ok(()) => Err(SessionError::Load(e)),
                    Err(StoreError::StaleLoad { .. }) => {
                        warn!("Ignoring failure of superseded load #{}", sequence);
                        Ok(LoadOutcome::Superseded)
                    }
                    Err(other) => Err(other.into()),
                }
            }
        }
    }
}

/// Resolves once a load newer than `sequence` has been issued
async fn wait_until_superseded(latest: &mut watch::Receiver<u64>, sequence: u64) {
    loop {
        if *latest.borrow_and_update() != sequence {
            return;
        }
        if latest.changed().await.is_err() {
            // Sender gone: nothing can supersede this load any more.
            std::future::pending::<()>().await;
        }
    }
}
