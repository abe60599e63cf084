mod app;
mod camera;

use app::UiApp;
use directories_next::{ProjectDirs, UserDirs};
use eframe::NativeOptions;
use freshcam_core::{CONFIG_FILE_NAME, FreshcamConfig};
use std::path::PathBuf;

fn main() {
    tracing_subscriber::fmt::init();

    let config_path = config_path();
    let config = match FreshcamConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("{e:#}; falling back to default settings");
            FreshcamConfig::default()
        }
    };
    let photos_dir = config
        .camera
        .photos_dir
        .clone()
        .unwrap_or_else(default_photos_dir);

    let app = match UiApp::new(config, config_path, photos_dir) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("FreshCam could not start: {e:#}");
            return;
        }
    };

    let options = NativeOptions::default();
    if let Err(e) = eframe::run_native("FreshCam", options, Box::new(|_cc| Ok(Box::new(app)))) {
        eprintln!("FreshCam stopped with an error: {e}");
    }
}

fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "FreshCam", "FreshCam")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

fn default_photos_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.picture_dir().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}
