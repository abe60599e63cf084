//! Capture-to-result pipeline for FreshCam.
//!
//! A [`CaptureController`] turns a shutter press into an [`ImageHandle`] and
//! hands its URI to the shell's [`Navigator`]. The result screen feeds that
//! handle into a [`ClassificationPipeline`], which posts the photo to the
//! classification service and settles in exactly one of loading, success or
//! failure.

pub mod capture;
pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod result;
pub mod view;

pub use capture::{
    CameraDevice, CaptureController, CaptureView, ImageHandle, Navigator, PermissionState,
};
pub use client::{ClassificationRequest, Classifier, HttpClassifier};
pub use config::{CONFIG_FILE_NAME, CameraConfig, EndpointConfig, FreshcamConfig};
pub use error::{ClassifyError, PipelineError};
pub use pipeline::{ClassificationPipeline, PipelineState};
pub use result::{
    Classification, ClassificationResult, EnvironmentalImpact, FoodSafety, Nutrition, Recipe,
    Ripeness, parse_payload,
};
pub use view::{Fact, RecipeView, ResultView, SuccessView, Tone};
