//! Camera permission gating and still capture.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Mime type of every photo handed to the classifier.
pub const JPEG_MIME: &str = "image/jpeg";

/// Opaque reference to one captured still image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHandle {
    uri: String,
    mime_type: String,
}

impl ImageHandle {
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Rebuild a handle from the URI passed across the navigation boundary.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self::new(uri, JPEG_MIME)
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Filesystem path behind the URI, with any `file://` scheme removed.
    pub fn local_path(&self) -> &str {
        self.uri.strip_prefix("file://").unwrap_or(&self.uri)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionState {
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// Platform camera: answers permission requests and takes pictures.
pub trait CameraDevice {
    fn request_permission(&mut self) -> PermissionState;
    fn take_picture(&mut self) -> Result<ImageHandle>;
}

/// Navigation subsystem the core calls into. Owned by the shell.
pub trait Navigator {
    /// Leave the camera for the result screen with the captured image URI.
    fn show_result(&mut self, image_uri: &str);
    fn go_to_camera(&mut self);
    fn go_back(&mut self);
}

/// What the camera screen should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureView {
    /// Permission has not been answered yet.
    RequestingPermission,
    /// Permission denied: persistent prompt with a retry action.
    PermissionPrompt,
    /// Live preview; the shutter is enabled only when `ready`.
    Preview { ready: bool },
}

/// Camera screen logic: permission flow, readiness and the shutter.
pub struct CaptureController<C> {
    camera: C,
    permission: PermissionState,
    ready: bool,
}

impl<C: CameraDevice> CaptureController<C> {
    pub fn new(camera: C) -> Self {
        Self {
            camera,
            permission: PermissionState::Unknown,
            ready: false,
        }
    }

    /// Ask for permission the first time the camera screen is shown.
    pub fn on_mount(&mut self) {
        if self.permission == PermissionState::Unknown {
            self.permission = self.camera.request_permission();
            tracing::debug!("camera permission after mount: {:?}", self.permission);
        }
    }

    /// Re-request permission from the denied prompt.
    pub fn retry_permission(&mut self) {
        if self.permission == PermissionState::Granted {
            return;
        }
        self.permission = self.camera.request_permission();
        tracing::info!("camera permission after retry: {:?}", self.permission);
    }

    /// Hardware initialization finished (or was lost).
    pub fn set_camera_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn can_capture(&self) -> bool {
        self.permission == PermissionState::Granted && self.ready
    }

    pub fn view(&self) -> CaptureView {
        match self.permission {
            PermissionState::Unknown => CaptureView::RequestingPermission,
            PermissionState::Denied => CaptureView::PermissionPrompt,
            PermissionState::Granted => CaptureView::Preview { ready: self.ready },
        }
    }

    /// Take one picture and hand it to the result screen.
    ///
    /// A no-op returning `None` unless permission is granted and the camera
    /// is ready. A failed shot is logged and also returns `None`.
    pub fn capture(&mut self, navigator: &mut dyn Navigator) -> Option<ImageHandle> {
        if !self.can_capture() {
            tracing::debug!(
                "capture ignored: permission={:?} ready={}",
                self.permission,
                self.ready
            );
            return None;
        }
        match self.camera.take_picture() {
            Ok(handle) => {
                tracing::info!("captured {}", handle.uri());
                navigator.show_result(handle.uri());
                Some(handle)
            }
            Err(e) => {
                tracing::warn!("capture failed: {e:#}");
                None
            }
        }
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::VecDeque;

    struct FakeCamera {
        answers: VecDeque<PermissionState>,
        requests: usize,
        shots: usize,
        fail_shot: bool,
    }

    impl FakeCamera {
        fn answering(answers: &[PermissionState]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                requests: 0,
                shots: 0,
                fail_shot: false,
            }
        }
    }

    impl CameraDevice for FakeCamera {
        fn request_permission(&mut self) -> PermissionState {
            self.requests += 1;
            self.answers.pop_front().unwrap_or(PermissionState::Denied)
        }

        fn take_picture(&mut self) -> Result<ImageHandle> {
            if self.fail_shot {
                anyhow::bail!("sensor busy");
            }
            self.shots += 1;
            Ok(ImageHandle::from_uri(format!("img://shot-{}", self.shots)))
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        results: Vec<String>,
    }

    impl Navigator for RecordingNavigator {
        fn show_result(&mut self, image_uri: &str) {
            self.results.push(image_uri.to_string());
        }
        fn go_to_camera(&mut self) {}
        fn go_back(&mut self) {}
    }

    #[test]
    fn mount_requests_permission_only_once() {
        let mut ctl = CaptureController::new(FakeCamera::answering(&[PermissionState::Granted]));
        assert_eq!(ctl.view(), CaptureView::RequestingPermission);
        ctl.on_mount();
        ctl.on_mount();
        assert_eq!(ctl.permission(), PermissionState::Granted);
        assert_eq!(ctl.camera().requests, 1);
        assert_eq!(ctl.view(), CaptureView::Preview { ready: false });
    }

    #[rstest]
    #[case(PermissionState::Unknown, true)]
    #[case(PermissionState::Denied, true)]
    #[case(PermissionState::Denied, false)]
    #[case(PermissionState::Granted, false)]
    fn capture_is_a_noop_unless_granted_and_ready(
        #[case] answer: PermissionState,
        #[case] ready: bool,
    ) {
        let mut ctl = CaptureController::new(FakeCamera::answering(&[answer]));
        if answer != PermissionState::Unknown {
            ctl.on_mount();
        }
        ctl.set_camera_ready(ready);
        let mut nav = RecordingNavigator::default();

        assert!(!ctl.can_capture());
        assert!(ctl.capture(&mut nav).is_none());
        assert!(ctl.capture(&mut nav).is_none());
        assert!(nav.results.is_empty());
        assert_eq!(ctl.camera().shots, 0);
    }

    #[test]
    fn each_capture_navigates_exactly_once() {
        let mut ctl = CaptureController::new(FakeCamera::answering(&[PermissionState::Granted]));
        ctl.on_mount();
        ctl.set_camera_ready(true);
        let mut nav = RecordingNavigator::default();

        let first = ctl.capture(&mut nav).expect("first shot");
        let second = ctl.capture(&mut nav).expect("second shot");

        assert_eq!(first.uri(), "img://shot-1");
        assert_eq!(second.mime_type(), JPEG_MIME);
        assert_eq!(nav.results, vec!["img://shot-1", "img://shot-2"]);
    }

    #[test]
    fn failed_shot_does_not_navigate() {
        let mut camera = FakeCamera::answering(&[PermissionState::Granted]);
        camera.fail_shot = true;
        let mut ctl = CaptureController::new(camera);
        ctl.on_mount();
        ctl.set_camera_ready(true);
        let mut nav = RecordingNavigator::default();

        assert!(ctl.capture(&mut nav).is_none());
        assert!(nav.results.is_empty());
        assert!(ctl.can_capture());
    }

    #[test]
    fn denied_prompt_retries_until_granted() {
        let mut ctl = CaptureController::new(FakeCamera::answering(&[
            PermissionState::Denied,
            PermissionState::Denied,
            PermissionState::Granted,
        ]));
        ctl.on_mount();
        assert_eq!(ctl.view(), CaptureView::PermissionPrompt);
        ctl.retry_permission();
        assert_eq!(ctl.view(), CaptureView::PermissionPrompt);
        ctl.retry_permission();
        ctl.set_camera_ready(true);
        assert_eq!(ctl.view(), CaptureView::Preview { ready: true });

        ctl.retry_permission();
        assert_eq!(ctl.camera().requests, 3);
    }

    #[test]
    fn local_path_strips_file_scheme() {
        assert_eq!(
            ImageHandle::from_uri("file:///tmp/a.jpg").local_path(),
            "/tmp/a.jpg"
        );
        assert_eq!(ImageHandle::from_uri("/tmp/b.jpg").local_path(), "/tmp/b.jpg");
    }
}
