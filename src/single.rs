//! Single-file mode: one upload + publish cycle summarised on one line.

use crate::vod::{UploadRequest, VodService};
use crate::Error;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// `filepath, title, uploadPath, uploaded, published, errorMessage`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleUploadReport {
    pub file_path: String,
    pub title: String,
    pub upload_path: String,
    pub uploaded: bool,
    pub published: bool,
    pub error: String,
}

impl SingleUploadReport {
    pub fn failed(file_path: &Path, title: &str, error: &Error) -> Self {
        Self {
            file_path: file_path.display().to_string(),
            title: title.to_string(),
            upload_path: String::new(),
            uploaded: false,
            published: false,
            error: error.to_string(),
        }
    }
}

impl fmt::Display for SingleUploadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, {}",
            self.file_path, self.title, self.upload_path, self.uploaded, self.published, self.error
        )
    }
}

/// The explicit title, or the file's base name when none is given.
pub fn resolve_title(file_path: &Path, title: Option<&str>) -> String {
    match title.filter(|t| !t.is_empty()) {
        Some(title) => title.to_string(),
        None => file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

pub async fn upload_single(
    vod: &dyn VodService,
    space_name: &str,
    file_path: &Path,
    title: &str,
    upload_path: Option<String>,
) -> SingleUploadReport {
    let request = UploadRequest::new(space_name, file_path, title).with_remote_name(upload_path);

    let media = match vod.upload_media(&request).await {
        Ok(media) => media,
        Err(e) => {
            warn!("Upload of {} failed: {}", file_path.display(), e);
            return SingleUploadReport::failed(file_path, title, &e);
        }
    };
    info!("Uploaded {} as {}", file_path.display(), media.vid);

    let (published, error) = match vod.publish_video(&media.vid).await {
        Ok(published) => (published, String::new()),
        Err(e) => {
            warn!("Publishing {} failed: {}", media.vid, e);
            (false, e.to_string())
        }
    };

    SingleUploadReport {
        file_path: file_path.display().to_string(),
        title: title.to_string(),
        upload_path: media.file_name,
        uploaded: true,
        published,
        error,
    }
}
