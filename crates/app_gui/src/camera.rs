//! Desktop stand-in for a phone camera: photos are picked from a folder.

use anyhow::{Result, bail};
use freshcam_core::{CameraDevice, ImageHandle, PermissionState};
use rfd::FileDialog;
use std::fs;
use std::path::{Path, PathBuf};

pub struct DesktopCamera {
    photos_dir: PathBuf,
}

impl DesktopCamera {
    pub fn new(photos_dir: PathBuf) -> Self {
        Self { photos_dir }
    }

    pub fn photos_dir(&self) -> &Path {
        &self.photos_dir
    }
}

impl CameraDevice for DesktopCamera {
    /// Granted while the photos folder can be listed.
    fn request_permission(&mut self) -> PermissionState {
        match fs::read_dir(&self.photos_dir) {
            Ok(_) => PermissionState::Granted,
            Err(e) => {
                tracing::warn!("cannot open {}: {e}", self.photos_dir.display());
                PermissionState::Denied
            }
        }
    }

    fn take_picture(&mut self) -> Result<ImageHandle> {
        let Some(path) = FileDialog::new()
            .set_directory(&self.photos_dir)
            .add_filter("Photo", &["jpg", "jpeg", "png"])
            .pick_file()
        else {
            bail!("no photo selected");
        };
        let Some(mime) = photo_mime(&path) else {
            bail!("not a JPEG or PNG photo: {}", path.display());
        };
        Ok(ImageHandle::new(format!("file://{}", path.display()), mime))
    }
}

fn photo_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension().and_then(|s| s.to_str())?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    #[case("a.JPG", Some("image/jpeg"))]
    #[case("b.jpeg", Some("image/jpeg"))]
    #[case("c.png", Some("image/png"))]
    #[case("notes.txt", None)]
    #[case("no-extension", None)]
    fn only_photos_are_accepted(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(photo_mime(Path::new(name)), expected);
    }

    #[test]
    fn permission_follows_folder_access() -> Result<()> {
        let dir = tempdir()?;
        let mut camera = DesktopCamera::new(dir.path().to_path_buf());
        assert_eq!(camera.request_permission(), PermissionState::Granted);

        let mut missing = DesktopCamera::new(dir.path().join("missing"));
        assert_eq!(missing.request_permission(), PermissionState::Denied);
        Ok(())
    }
}
