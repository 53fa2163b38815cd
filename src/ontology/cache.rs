//! Revision-gated cache holding at most one derived view.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard,
};

use tracing::{debug, info, warn};

use super::{
    reasoner::{DerivedView, Reasoner, ReasonerError},
    repositories::AxiomStore,
    revision::RevisionCounter,
};
use crate::Result;

struct CachedView {
    revision: u64,
    view: Box<dyn DerivedView>,
}

/// Serves a precomputed [`DerivedView`] that is never older than the current
/// revision.
///
/// The stamp check, the rebuild and the caller's read all happen under one
/// mutex, so a view cannot be disposed by another thread while it is being
/// read. Writers never take this lock: they only bump the revision, and the
/// next reader notices the mismatch.
pub struct DerivedViewCache {
    reasoner: Arc<dyn Reasoner>,
    revision: Arc<RevisionCounter>,
    slot: Mutex<Option<CachedView>>,
    rebuilds: AtomicU64,
}

impl DerivedViewCache {
    #[must_use]
    pub fn new(reasoner: Arc<dyn Reasoner>, revision: Arc<RevisionCounter>) -> Self {
        Self {
            reasoner,
            revision,
            slot: Mutex::new(None),
            rebuilds: AtomicU64::new(0),
        }
    }

    /// Runs `read` against a view that reflects the current revision,
    /// rebuilding the cached view first when it is missing or stale.
    ///
    /// The view is stamped with the revision observed *before* it was built.
    /// A mutation racing with the build therefore leaves a stale stamp behind
    /// and the following call rebuilds again.
    ///
    /// # Errors
    ///
    /// Construction, precomputation and read failures are returned as
    /// [`crate::Error::Reasoner`]. A failed rebuild leaves the cache empty.
    pub fn with_view<T, F>(&self, store: &dyn AxiomStore, read: F) -> Result<T>
    where
        F: FnOnce(&dyn DerivedView) -> Result<T, ReasonerError>,
    {
        let mut slot = self.guard();
        let current = self.revision.current();

        let cached = match slot.take() {
            Some(cached) if cached.revision == current => slot.insert(cached),
            stale => {
                if let Some(mut stale) = stale {
                    debug!(
                        stale_revision = stale.revision,
                        revision = current,
                        "derived_view_invalidated"
                    );
                    stale.view.dispose();
                }
                let view = self.build(store, current)?;
                slot.insert(CachedView {
                    revision: current,
                    view,
                })
            }
        };
        Ok(read(cached.view.as_ref())?)
    }

    /// Disposes and forgets the cached view. Does nothing when empty.
    pub fn dispose(&self) {
        if let Some(mut cached) = self.guard().take() {
            debug!(revision = cached.revision, "derived_view_disposed");
            cached.view.dispose();
        }
    }

    #[must_use]
    pub fn reasoner_name(&self) -> &str {
        self.reasoner.name()
    }

    /// Revision the cached view was built from, if a view is cached.
    #[must_use]
    pub fn stamp(&self) -> Option<u64> {
        self.guard().as_ref().map(|cached| cached.revision)
    }

    /// Number of views successfully built over the cache's life.
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds.load(Ordering::SeqCst)
    }

    fn build(&self, store: &dyn AxiomStore, revision: u64) -> Result<Box<dyn DerivedView>> {
        let engine = self.reasoner.name();
        let mut view = self.reasoner.create_view(store).map_err(|err| {
            warn!(engine, revision, error = %err, "derived_view_build_failed");
            err
        })?;
        if let Err(err) = view.precompute() {
            warn!(engine, revision, error = %err, "derived_view_precompute_failed");
            view.dispose();
            return Err(err.into());
        }
        let rebuilds = self.rebuilds.fetch_add(1, Ordering::SeqCst) + 1;
        info!(engine, revision, rebuilds, "derived_view_rebuilt");
        Ok(view)
    }

    fn guard(&self) -> MutexGuard<'_, Option<CachedView>> {
        self.slot.lock().expect("derived view cache poisoned")
    }
}

impl Drop for DerivedViewCache {
    fn drop(&mut self) {
        let slot = match self.slot.get_mut() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(mut cached) = slot.take() {
            cached.view.dispose();
        }
    }
}

impl std::fmt::Debug for DerivedViewCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedViewCache")
            .field("reasoner", &self.reasoner.name())
            .field("stamp", &self.stamp())
            .field("rebuilds", &self.rebuilds())
            .finish_non_exhaustive()
    }
}
