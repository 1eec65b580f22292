//! Check session coordinating the readiness workflow
//!
//! This module provides:
//! - Workflow coordination: read manifest → load catalog → classify
//! - Catalog lifecycle: not asked → loading → loaded / failed
//! - Deferred checks that wait for the catalog, and rejecting checks that don't
//! - Repository manifests fetched by name
//!
//! The catalog state is published on a watch channel, so it can be read (or
//! observed) while a load is in flight. Failures are never retried here. A
//! failed catalog stays failed until the caller asks for a reload.

use crate::classifier::classify;
use crate::domain::{Catalog, ReadinessResult, RenameTable, RepoLocation};
use crate::error::{CatalogError, CheckError, RemoteManifestError};
use crate::manifest::{parse_manifest, Manifest};
use crate::progress::Progress;
use crate::registry::{CatalogSource, ManifestSource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// Observable state of the package catalog
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    /// No load requested yet, or the last load was abandoned
    #[default]
    NotAsked,
    /// Load in flight
    Loading,
    /// Loaded and immutable from here on
    Loaded(Arc<Catalog>),
    /// Load failed; kept until a reload is requested
    Failed(CatalogError),
}

impl CatalogState {
    /// Returns the catalog when loaded
    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match self {
            CatalogState::Loaded(catalog) => Some(catalog),
            _ => None,
        }
    }

    /// Returns true once the catalog is loaded
    pub fn is_loaded(&self) -> bool {
        matches!(self, CatalogState::Loaded(_))
    }
}

/// Where the checked manifest came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum ManifestOrigin {
    /// Supplied directly by the user
    Pasted,
    /// Fetched for a repository
    Repository(String),
}

/// Outcome of a successful check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessReport {
    /// Where the manifest came from
    pub origin: ManifestOrigin,
    /// The parsed manifest
    pub manifest: Manifest,
    /// Status of every declared package
    pub result: ReadinessResult,
    /// When the check ran
    pub checked_at: DateTime<Utc>,
}

/// Returns `Loading` to `NotAsked` if the owning load is dropped before it finishes
struct LoadGuard<'a> {
    state: &'a watch::Sender<CatalogState>,
    armed: bool,
}

impl LoadGuard<'_> {
    /// Publish the outcome of the load
    fn finish(mut self, outcome: CatalogState) {
        self.armed = false;
        self.state.send_replace(outcome);
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.state.send_if_modified(|state| {
            if matches!(state, CatalogState::Loading) {
                *state = CatalogState::NotAsked;
                true
            } else {
                false
            }
        });
    }
}

/// A check session holding the catalog state and the rename table
pub struct Session {
    /// Where the catalog is loaded from
    catalog_source: Box<dyn CatalogSource>,
    /// Known renames
    renames: Arc<RenameTable>,
    /// Current catalog state
    catalog: watch::Sender<CatalogState>,
    /// Spinners while waiting on sources
    progress: Progress,
}

impl Session {
    /// Create a session using the built-in rename table
    pub fn new(catalog_source: Box<dyn CatalogSource>) -> Self {
        let (catalog, _) = watch::channel(CatalogState::NotAsked);
        Self {
            catalog_source,
            renames: RenameTable::shared_builtin(),
            catalog,
            progress: Progress::new(false),
        }
    }

    /// Use a different rename table
    pub fn with_renames(mut self, renames: RenameTable) -> Self {
        self.renames = Arc::new(renames);
        self
    }

    /// Show spinners while loading
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.progress = Progress::new(show_progress);
        self
    }

    /// Snapshot of the current catalog state
    pub fn catalog_state(&self) -> CatalogState {
        self.catalog.borrow().clone()
    }

    /// Receiver notified on every catalog state change
    pub fn watch_catalog(&self) -> watch::Receiver<CatalogState> {
        self.catalog.subscribe()
    }

    /// Description of the catalog source
    pub fn catalog_origin(&self) -> String {
        self.catalog_source.describe()
    }

    /// The rename table in use
    pub fn renames(&self) -> &RenameTable {
        &self.renames
    }

    /// Load the catalog if it has not been requested yet
    ///
    /// Joins a load already in flight. A previous failure is returned again
    /// without contacting the source.
    pub async fn load_catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        loop {
            let mut updates = self.catalog.subscribe();
            let claimed = self.catalog.send_if_modified(|state| {
                if matches!(state, CatalogState::NotAsked) {
                    *state = CatalogState::Loading;
                    true
                } else {
                    false
                }
            });
            if claimed {
                return self.fetch_catalog().await;
            }

            let current = updates.borrow_and_update().clone();
            match current {
                CatalogState::Loaded(catalog) => return Ok(catalog),
                CatalogState::Failed(err) => return Err(err),
                CatalogState::Loading => {
                    // The sender lives in `self`, so this only ends on a change
                    let _ = updates.changed().await;
                }
                CatalogState::NotAsked => {}
            }
        }
    }

    /// Discard a finished result and load the catalog again
    ///
    /// A load still in flight is joined rather than restarted.
    pub async fn reload_catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        self.catalog.send_if_modified(|state| {
            if matches!(state, CatalogState::Loaded(_) | CatalogState::Failed(_)) {
                *state = CatalogState::NotAsked;
                true
            } else {
                false
            }
        });
        self.load_catalog().await
    }

    /// Run the load claimed by `load_catalog`
    async fn fetch_catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        let guard = LoadGuard {
            state: &self.catalog,
            armed: true,
        };
        let loaded = self
            .progress
            .while_pending("Loading package catalog...", self.catalog_source.load())
            .await;

        match loaded {
            Ok(catalog) => {
                let catalog = Arc::new(catalog);
                guard.finish(CatalogState::Loaded(Arc::clone(&catalog)));
                Ok(catalog)
            }
            Err(err) => {
                guard.finish(CatalogState::Failed(err.clone()));
                Err(err)
            }
        }
    }

    /// Check a manifest supplied as text, waiting for the catalog if needed
    pub async fn check_pasted(&self, text: &str) -> Result<ReadinessReport, CheckError> {
        let manifest = parse_manifest(text).map_err(CheckError::from);
        let catalog = self.load_catalog().await;
        self.finish(ManifestOrigin::Pasted, manifest, catalog)
    }

    /// Check a manifest supplied as text without waiting for the catalog
    ///
    /// Rejected with `CatalogNotReady` unless the catalog is already loaded.
    pub fn try_check_pasted(&self, text: &str) -> Result<ReadinessReport, CheckError> {
        let manifest = parse_manifest(text).map_err(CheckError::from);

        let catalog = match self.catalog_state() {
            CatalogState::Loaded(catalog) => Ok(catalog),
            CatalogState::Failed(err) => Err(err),
            CatalogState::NotAsked | CatalogState::Loading => {
                manifest?;
                return Err(CheckError::CatalogNotReady);
            }
        };

        self.finish(ManifestOrigin::Pasted, manifest, catalog)
    }

    /// Fetch the manifest of a repository and check it
    pub async fn check_repository(
        &self,
        source: &dyn ManifestSource,
        location: &RepoLocation,
    ) -> Result<ReadinessReport, CheckError> {
        let fetched = self
            .progress
            .while_pending(
                &format!("Fetching manifest for {}...", location),
                source.fetch(location),
            )
            .await;

        let manifest = fetched.and_then(|text| {
            parse_manifest(&text)
                .map_err(|e| RemoteManifestError::invalid_manifest(location.to_string(), e))
        });
        let catalog = self.load_catalog().await;

        self.finish(
            ManifestOrigin::Repository(location.to_string()),
            manifest.map_err(CheckError::from),
            catalog,
        )
    }

    /// Classify once both inputs are available
    fn finish(
        &self,
        origin: ManifestOrigin,
        manifest: Result<Manifest, CheckError>,
        catalog: Result<Arc<Catalog>, CatalogError>,
    ) -> Result<ReadinessReport, CheckError> {
        match (manifest, catalog) {
            (Ok(manifest), Ok(catalog)) => {
                let result = classify(manifest.package_names(), &catalog, &self.renames);
                Ok(ReadinessReport {
                    origin,
                    manifest,
                    result,
                    checked_at: Utc::now(),
                })
            }
            (Err(manifest_err), Ok(_)) => Err(manifest_err),
            (Ok(_), Err(catalog_err)) => Err(catalog_err.into()),
            (Err(manifest_err), Err(catalog_err)) => {
                Err(CheckError::combined(manifest_err, catalog_err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyStatus, PackageName};
    use crate::error::ManifestError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Catalog source returning fixed names and counting loads
    struct FakeCatalog {
        names: Vec<&'static str>,
        fail: bool,
        loads: Arc<AtomicUsize>,
        /// When set, each load waits for a notification before returning
        gate: Option<Arc<Notify>>,
    }

    impl FakeCatalog {
        fn with(names: Vec<&'static str>) -> (Self, Arc<AtomicUsize>) {
            let loads = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    names,
                    fail: false,
                    loads: Arc::clone(&loads),
                    gate: None,
                },
                loads,
            )
        }

        fn gated(names: Vec<&'static str>) -> (Self, Arc<AtomicUsize>, Arc<Notify>) {
            let (mut source, loads) = Self::with(names);
            let gate = Arc::new(Notify::new());
            source.gate = Some(Arc::clone(&gate));
            (source, loads, gate)
        }

        fn failing() -> (Self, Arc<AtomicUsize>) {
            let (mut source, loads) = Self::with(Vec::new());
            source.fail = true;
            (source, loads)
        }
    }

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        fn describe(&self) -> String {
            "fake".to_string()
        }

        async fn load(&self) -> Result<Catalog, CatalogError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                Err(CatalogError::Transport {
                    url: "fake".to_string(),
                    message: "connection refused".to_string(),
                })
            } else {
                Ok(self.names.iter().copied().collect())
            }
        }
    }

    /// Manifest source serving a fixed document for one repository
    struct FakeManifests {
        known: RepoLocation,
        body: &'static str,
    }

    #[async_trait]
    impl ManifestSource for FakeManifests {
        fn describe(&self, location: &RepoLocation) -> String {
            format!("fake://{}", location)
        }

        async fn fetch(&self, location: &RepoLocation) -> Result<String, RemoteManifestError> {
            if location == &self.known {
                Ok(self.body.to_string())
            } else {
                Err(RemoteManifestError::NotFound {
                    location: location.to_string(),
                })
            }
        }
    }

    const LEGACY_MANIFEST: &str = r#"{
        "dependencies": {
            "elm-lang/core": "5.1.1 <= v < 6.0.0",
            "elm-lang/html": "2.0.0 <= v < 3.0.0",
            "elm-community/list-extra": "7.0.0 <= v < 8.0.0",
            "elm-lang/websocket": "1.0.2 <= v < 2.0.0"
        },
        "elm-version": "0.18.0 <= v < 0.19.0"
    }"#;

    fn session_with(names: Vec<&'static str>) -> (Session, Arc<AtomicUsize>) {
        let (source, loads) = FakeCatalog::with(names);
        (Session::new(Box::new(source)), loads)
    }

    #[tokio::test]
    async fn test_check_pasted_classifies_manifest() {
        let (session, _) =
            session_with(vec!["elm/core", "elm/json", "elm/html", "elm-community/list-extra"]);

        let report = session.check_pasted(LEGACY_MANIFEST).await.unwrap();

        assert_eq!(report.origin, ManifestOrigin::Pasted);
        assert_eq!(report.result.len(), 4);
        assert_eq!(
            report.result.get(&"elm-community/list-extra".into()),
            Some(&DependencyStatus::Ready)
        );
        assert_eq!(
            report.result.get(&"elm-lang/html".into()),
            Some(&DependencyStatus::ReplacedWith(vec!["elm/html".into()]))
        );
        assert_eq!(
            report.result.get(&"elm-lang/websocket".into()),
            Some(&DependencyStatus::NotReady)
        );
    }

    #[tokio::test]
    async fn test_catalog_state_transitions() {
        let (session, loads) = session_with(vec!["elm/core"]);
        assert!(matches!(session.catalog_state(), CatalogState::NotAsked));

        session.load_catalog().await.unwrap();
        assert!(session.catalog_state().is_loaded());
        assert_eq!(session.catalog_state().catalog().map(|c| c.len()), Some(1));

        session.check_pasted(LEGACY_MANIFEST).await.unwrap();
        session.check_pasted(LEGACY_MANIFEST).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_catalog_is_not_retried() {
        let (source, loads) = FakeCatalog::failing();
        let session = Session::new(Box::new(source));

        let err = session.check_pasted(LEGACY_MANIFEST).await.unwrap_err();
        assert!(matches!(err, CheckError::Catalog(_)));
        assert_eq!(err.user_message(), "could not load the package catalog");
        assert!(matches!(session.catalog_state(), CatalogState::Failed(_)));

        let again = session.check_pasted(LEGACY_MANIFEST).await.unwrap_err();
        assert!(matches!(again, CheckError::Catalog(_)));
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        assert!(session.reload_catalog().await.is_err());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_malformed_manifest_is_manifest_error() {
        let (session, _) = session_with(vec!["elm/core"]);

        let err = session.check_pasted("{ not json").await.unwrap_err();

        assert!(matches!(
            err,
            CheckError::Manifest(ManifestError::InvalidJson { .. })
        ));
        assert_eq!(err.user_message(), "could not read the pasted manifest");
    }

    #[tokio::test]
    async fn test_both_failures_are_unclassified() {
        let (source, _) = FakeCatalog::failing();
        let session = Session::new(Box::new(source));

        let err = session.check_pasted(r#"{"version": "1.0.0"}"#).await.unwrap_err();

        match err {
            CheckError::Unclassified { causes } => {
                assert_eq!(causes.len(), 2);
                assert!(causes[0].contains("dependencies"));
                assert!(causes[1].contains("connection refused"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_try_check_rejects_before_load() {
        let (session, loads) = session_with(vec!["elm/core"]);

        let err = session.try_check_pasted(LEGACY_MANIFEST).unwrap_err();
        assert_eq!(err, CheckError::CatalogNotReady);
        assert_eq!(loads.load(Ordering::SeqCst), 0);

        session.load_catalog().await.unwrap();
        let report = session.try_check_pasted(LEGACY_MANIFEST).unwrap();
        assert_eq!(report.result.len(), 4);
    }

    #[test]
    fn test_try_check_reports_manifest_error_first() {
        let (session, _) = session_with(vec!["elm/core"]);
        let err = session.try_check_pasted("[]").unwrap_err();
        assert_eq!(err, CheckError::Manifest(ManifestError::NotAnObject));
    }

    #[tokio::test]
    async fn test_custom_renames() {
        let renames = RenameTable::new([(
            "elm-lang/websocket",
            vec!["billstclair/elm-websocket-client"],
        )])
        .unwrap();
        let (session, _) = session_with(vec![]);
        let session = session.with_renames(renames);

        let report = session.check_pasted(LEGACY_MANIFEST).await.unwrap();

        assert_eq!(
            report.result.get(&"elm-lang/websocket".into()),
            Some(&DependencyStatus::ReplacedWith(vec![PackageName::from(
                "billstclair/elm-websocket-client"
            )]))
        );
        assert_eq!(
            report.result.get(&"elm-lang/core".into()),
            Some(&DependencyStatus::NotReady)
        );
    }

    #[tokio::test]
    async fn test_check_repository() {
        let manifests = FakeManifests {
            known: "evancz/elm-todomvc".parse().unwrap(),
            body: LEGACY_MANIFEST,
        };
        let (session, _) = session_with(vec!["elm/core"]);
        let location: RepoLocation = "evancz/elm-todomvc".parse().unwrap();

        let report = session.check_repository(&manifests, &location).await.unwrap();

        assert_eq!(
            report.origin,
            ManifestOrigin::Repository("evancz/elm-todomvc".to_string())
        );
        assert_eq!(report.result.len(), 4);
        assert!(!report.manifest.targets_new_platform());
    }

    #[tokio::test]
    async fn test_check_repository_not_found() {
        let manifests = FakeManifests {
            known: "evancz/elm-todomvc".parse().unwrap(),
            body: LEGACY_MANIFEST,
        };
        let (session, _) = session_with(vec!["elm/core"]);
        let location: RepoLocation = "someone/missing".parse().unwrap();

        let err = session.check_repository(&manifests, &location).await.unwrap_err();

        assert_eq!(
            err,
            CheckError::RemoteManifest(RemoteManifestError::NotFound {
                location: "someone/missing".to_string()
            })
        );
        assert!(err.user_message().contains("someone/missing"));
    }

    #[tokio::test]
    async fn test_check_repository_invalid_manifest() {
        let manifests = FakeManifests {
            known: "evancz/elm-todomvc".parse().unwrap(),
            body: "<html>404</html>",
        };
        let (session, _) = session_with(vec!["elm/core"]);
        let location: RepoLocation = "evancz/elm-todomvc".parse().unwrap();

        let err = session.check_repository(&manifests, &location).await.unwrap_err();

        assert!(matches!(
            err,
            CheckError::RemoteManifest(RemoteManifestError::InvalidManifest { .. })
        ));
    }

    #[tokio::test]
    async fn test_loading_is_visible_while_fetch_is_in_flight() {
        let (source, loads, gate) = FakeCatalog::gated(vec!["elm/core"]);
        let session = Session::new(Box::new(source));
        let updates = session.watch_catalog();

        let load = session.load_catalog();
        tokio::pin!(load);
        let pending = tokio::time::timeout(Duration::from_millis(20), &mut load).await;
        assert!(pending.is_err());

        assert!(matches!(session.catalog_state(), CatalogState::Loading));
        assert!(matches!(*updates.borrow(), CatalogState::Loading));
        assert_eq!(
            session.try_check_pasted(LEGACY_MANIFEST).unwrap_err(),
            CheckError::CatalogNotReady
        );

        gate.notify_one();
        load.await.unwrap();

        assert!(session.catalog_state().is_loaded());
        assert!(updates.borrow().is_loaded());
        assert!(session.try_check_pasted(LEGACY_MANIFEST).is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_abandoned_load_returns_to_not_asked() {
        let (source, loads, gate) = FakeCatalog::gated(vec!["elm/core"]);
        let session = Session::new(Box::new(source));

        let abandoned =
            tokio::time::timeout(Duration::from_millis(20), session.load_catalog()).await;
        assert!(abandoned.is_err());

        assert!(matches!(session.catalog_state(), CatalogState::NotAsked));
        assert_eq!(
            session.try_check_pasted(LEGACY_MANIFEST).unwrap_err(),
            CheckError::CatalogNotReady
        );

        gate.notify_one();
        session.load_catalog().await.unwrap();
        assert!(session.catalog_state().is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_checks_share_one_load() {
        let (source, loads, gate) = FakeCatalog::gated(vec!["elm/core"]);
        let session = Session::new(Box::new(source));

        let release = async {
            tokio::task::yield_now().await;
            gate.notify_one();
        };
        let (first, second, _) = tokio::join!(
            session.check_pasted(LEGACY_MANIFEST),
            session.check_pasted(LEGACY_MANIFEST),
            release
        );

        assert_eq!(first.unwrap().result, second.unwrap().result);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sessions_share_builtin_renames() {
        let (first, _) = session_with(vec![]);
        let (second, _) = session_with(vec![]);
        assert!(std::ptr::eq(first.renames(), second.renames()));
        assert!(std::ptr::eq(first.renames(), RenameTable::builtin()));
    }
}
