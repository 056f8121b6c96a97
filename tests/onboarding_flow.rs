//! Integration tests for the onboarding controller against a real libSQL
//! flag store.
//!
//! Each test opens a database file in a temp dir, so "relaunching" is just
//! building a second controller over the same path.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use capture_onboarding::capture::{AssetRef, CaptureGateway, CaptureOptions, CaptureResult};
use capture_onboarding::channels::{Console, ConsolePermissionGateway};
use capture_onboarding::config::ControllerConfig;
use capture_onboarding::error::{CaptureError, PermissionError};
use capture_onboarding::onboarding::{
    Advisory, AdvisoryPresenter, AdvisoryResponse, CaptureOutcome, LaunchKind,
    OnboardingController, SessionPhase,
};
use capture_onboarding::permissions::{MediaSource, PermissionGateway, PermissionStatus};
use capture_onboarding::store::{FlagStore, LibSqlBackend, settings_keys};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Platform stub: fixed request answers, queries report what was granted.
struct StubPermissions {
    camera: PermissionStatus,
    gallery: PermissionStatus,
    requests: AtomicUsize,
    queries: AtomicUsize,
}

impl StubPermissions {
    fn new(camera: PermissionStatus, gallery: PermissionStatus) -> Arc<Self> {
        Arc::new(Self {
            camera,
            gallery,
            requests: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        })
    }

    fn status(&self, media: MediaSource) -> PermissionStatus {
        match media {
            MediaSource::Camera => self.camera,
            MediaSource::Gallery => self.gallery,
        }
    }
}

#[async_trait]
impl PermissionGateway for StubPermissions {
    async fn query(&self, media: MediaSource) -> Result<PermissionStatus, PermissionError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.status(media))
    }

    async fn request(&self, media: MediaSource) -> Result<PermissionStatus, PermissionError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.status(media))
    }

    fn open_platform_settings(&self) {}
}

/// Picker stub that always returns the same asset and counts launches.
struct StubPicker {
    launches: AtomicUsize,
}

#[async_trait]
impl CaptureGateway for StubPicker {
    async fn launch_camera(&self, _options: &CaptureOptions) -> Result<CaptureResult, CaptureError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(CaptureResult::Asset(AssetRef::new("file:///dcim/0001.jpg")))
    }

    async fn launch_gallery(
        &self,
        _options: &CaptureOptions,
    ) -> Result<CaptureResult, CaptureError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(CaptureResult::Asset(AssetRef::new("file:///library/0002.jpg")))
    }
}

/// Acknowledges everything and records what was shown.
#[derive(Default)]
struct AckPresenter {
    shown: Mutex<Vec<Advisory>>,
}

impl AckPresenter {
    fn shown(&self) -> Vec<Advisory> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdvisoryPresenter for AckPresenter {
    async fn present(&self, advisory: Advisory) -> AdvisoryResponse {
        self.shown.lock().unwrap().push(advisory);
        AdvisoryResponse::Acknowledged
    }
}

struct Session {
    controller: OnboardingController,
    permissions: Arc<StubPermissions>,
    picker: Arc<StubPicker>,
    presenter: Arc<AckPresenter>,
}

async fn launch(db_path: &Path, camera: PermissionStatus, gallery: PermissionStatus) -> Session {
    let flags: Arc<dyn FlagStore> = Arc::new(LibSqlBackend::new_local(db_path).await.unwrap());
    let permissions = StubPermissions::new(camera, gallery);
    let picker = Arc::new(StubPicker {
        launches: AtomicUsize::new(0),
    });
    let presenter = Arc::new(AckPresenter::default());
    let controller = OnboardingController::new(
        flags,
        permissions.clone(),
        picker.clone(),
        presenter.clone(),
        ControllerConfig::default(),
    );
    Session {
        controller,
        permissions,
        picker,
        presenter,
    }
}

#[tokio::test]
async fn fresh_install_onboards_then_relaunch_skips_onboarding() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("app.db");

        // First launch: flag absent, both permissions granted.
        {
            let s = launch(&db_path, PermissionStatus::Granted, PermissionStatus::Granted).await;
            assert_eq!(s.controller.initialize().await, LaunchKind::FirstLaunch);

            let snap = s.controller.snapshot();
            assert_eq!(snap.phase, SessionPhase::Ready);
            assert!(snap.camera_granted && snap.gallery_granted);
            assert_eq!(
                s.presenter.shown(),
                vec![Advisory::Welcome, Advisory::OnboardingComplete]
            );
            assert_eq!(s.permissions.requests.load(Ordering::SeqCst), 2);
            assert_eq!(s.permissions.queries.load(Ordering::SeqCst), 0);
        }

        // The flag is durable.
        let db = LibSqlBackend::new_local(&db_path).await.unwrap();
        assert_eq!(
            db.get_flag(settings_keys::HAS_LAUNCHED).await.unwrap(),
            Some(true)
        );
        drop(db);

        // Second launch: no welcome, one refresh, no requests.
        let s = launch(&db_path, PermissionStatus::Granted, PermissionStatus::Granted).await;
        assert_eq!(s.controller.initialize().await, LaunchKind::Returning);
        assert!(s.presenter.shown().is_empty());
        assert_eq!(s.permissions.queries.load(Ordering::SeqCst), 2);
        assert_eq!(s.permissions.requests.load(Ordering::SeqCst), 0);
        assert_eq!(s.controller.phase(), SessionPhase::Ready);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn fresh_install_with_camera_denied() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let s = launch(
            &dir.path().join("app.db"),
            PermissionStatus::Denied,
            PermissionStatus::Granted,
        )
        .await;

        s.controller.initialize().await;

        let snap = s.controller.snapshot();
        assert_eq!(snap.phase, SessionPhase::Ready);
        assert!(!snap.camera_granted);
        assert!(snap.gallery_granted);
        assert!(!s.presenter.shown().contains(&Advisory::OnboardingComplete));
        assert_eq!(s.permissions.requests.load(Ordering::SeqCst), 2);

        // Gallery works, camera is refused with an advisory.
        assert_eq!(
            s.controller.attempt_capture(MediaSource::Gallery).await,
            CaptureOutcome::Captured(AssetRef::new("file:///library/0002.jpg"))
        );
        assert_eq!(
            s.controller.attempt_capture(MediaSource::Camera).await,
            CaptureOutcome::PermissionNeeded
        );
        assert_eq!(s.picker.launches.load(Ordering::SeqCst), 1);
        assert_eq!(
            s.controller.snapshot().captured_asset,
            Some(AssetRef::new("file:///library/0002.jpg"))
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn returning_user_without_camera_permission_is_advised() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("app.db");
        LibSqlBackend::new_local(&db_path)
            .await
            .unwrap()
            .set_flag(settings_keys::HAS_LAUNCHED, true)
            .await
            .unwrap();

        let s = launch(&db_path, PermissionStatus::Denied, PermissionStatus::Denied).await;
        s.controller.initialize().await;

        let outcome = s.controller.attempt_capture(MediaSource::Camera).await;

        assert_eq!(outcome, CaptureOutcome::PermissionNeeded);
        assert_eq!(
            s.presenter.shown(),
            vec![Advisory::PermissionNeeded {
                media: MediaSource::Camera
            }]
        );
        assert!(s.controller.snapshot().captured_asset.is_none());
        assert_eq!(s.picker.launches.load(Ordering::SeqCst), 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn each_capture_replaces_the_asset() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let s = launch(
            &dir.path().join("app.db"),
            PermissionStatus::Granted,
            PermissionStatus::Granted,
        )
        .await;
        s.controller.initialize().await;

        s.controller.attempt_capture(MediaSource::Camera).await;
        assert_eq!(
            s.controller.snapshot().captured_asset,
            Some(AssetRef::new("file:///dcim/0001.jpg"))
        );

        s.controller.attempt_capture(MediaSource::Gallery).await;
        let snap = s.controller.snapshot();
        assert_eq!(
            snap.captured_asset,
            Some(AssetRef::new("file:///library/0002.jpg"))
        );
        assert!(!snap.busy);
    })
    .await
    .expect("test timed out");
}

/// Controller over the console permission gateway, answering prompts from `typed`.
async fn console_launch(db_path: &Path, typed: &str) -> (OnboardingController, Arc<StubPicker>) {
    let db = Arc::new(LibSqlBackend::new_local(db_path).await.unwrap());
    let console = Arc::new(Console::from_reader(std::io::Cursor::new(
        typed.as_bytes().to_vec(),
    )));
    let picker = Arc::new(StubPicker {
        launches: AtomicUsize::new(0),
    });
    let controller = OnboardingController::new(
        db.clone(),
        Arc::new(ConsolePermissionGateway::new(console, db)),
        picker.clone(),
        Arc::new(AckPresenter::default()),
        ControllerConfig::default(),
    );
    (controller, picker)
}

#[tokio::test]
async fn console_grants_carry_over_to_the_next_launch() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("app.db");

        {
            let (controller, _) = console_launch(&db_path, "y\nn\n").await;
            assert_eq!(controller.initialize().await, LaunchKind::FirstLaunch);
            let snap = controller.snapshot();
            assert!(snap.camera_granted);
            assert!(!snap.gallery_granted);
        }

        // Relaunch with no input at all: the refresh reads the stored answers.
        let (controller, picker) = console_launch(&db_path, "").await;
        assert_eq!(controller.initialize().await, LaunchKind::Returning);
        let snap = controller.snapshot();
        assert!(snap.camera_granted);
        assert!(!snap.gallery_granted);

        assert_eq!(
            controller.attempt_capture(MediaSource::Camera).await,
            CaptureOutcome::Captured(AssetRef::new("file:///dcim/0001.jpg"))
        );
        assert_eq!(
            controller.attempt_capture(MediaSource::Gallery).await,
            CaptureOutcome::PermissionNeeded
        );
        assert_eq!(picker.launches.load(Ordering::SeqCst), 1);
    })
    .await
    .expect("test timed out");
}
