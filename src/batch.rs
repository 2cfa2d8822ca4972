//! Batch mode: walk an input directory, upload and publish every video, and
//! move each uploaded file into the output directory.

use crate::models::UploadOutcome;
use crate::vod::{UploadRequest, VodService};
use crate::{Error, Result};
use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "mkv"];

/// Outcomes collected by one walk, plus the error that stopped it early.
#[derive(Debug, Default)]
pub struct BatchRun {
    pub outcomes: Vec<UploadOutcome>,
    pub aborted: Option<Error>,
}

impl BatchRun {
    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }
}

/// Case-sensitive extension check against [`VIDEO_EXTENSIONS`].
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext))
}

pub fn directory_exists(path: &Path) -> bool {
    let absolute = match std::path::absolute(path) {
        Ok(p) => p,
        Err(_) => return false,
    };

    if !absolute.is_dir() {
        error!("{}", Error::DirectoryNotFound(path.to_path_buf()));
        return false;
    }

    true
}

/// Move `path` into `directory` under its base name without overwriting.
pub fn move_file(path: &Path, directory: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Config(format!("{} has no file name", path.display())))?;
    let destination = directory.join(file_name);

    // hard_link fails on an existing destination, unlike rename
    match fs::hard_link(path, &destination) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(Error::DestinationExists(destination));
        }
        Err(link_err) => {
            warn!(
                "Linking {} -> {} failed ({}), copying instead",
                path.display(),
                destination.display(),
                link_err
            );
            copy_new(path, &destination)?;
        }
    }
    fs::remove_file(path)?;

    Ok(destination)
}

/// Copy `src` to `dst`, refusing to touch a `dst` that already exists.
fn copy_new(src: &Path, dst: &Path) -> Result<()> {
    let mut reader = fs::File::open(src)?;
    let mut writer = match OpenOptions::new().write(true).create_new(true).open(dst) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(Error::DestinationExists(dst.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let copied = io::copy(&mut reader, &mut writer)
        .and_then(|_| writer.set_permissions(reader.metadata()?.permissions()));
    if let Err(e) = copied {
        let _ = fs::remove_file(dst);
        return Err(e.into());
    }

    Ok(())
}

fn is_same_directory(candidate: &Path, target: Option<&PathBuf>) -> bool {
    match target {
        Some(target) => fs::canonicalize(candidate).is_ok_and(|c| &c == target),
        None => false,
    }
}

pub async fn upload_videos_in_directory(
    vod: &dyn VodService,
    space_name: &str,
    input_dir: &Path,
    output_dir: &Path,
) -> BatchRun {
    let mut run = BatchRun::default();
    let output_canonical = fs::canonicalize(output_dir).ok();

    let walker = WalkDir::new(input_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.depth() > 0
                && entry.file_type().is_dir()
                && is_same_directory(entry.path(), output_canonical.as_ref()))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Failed to walk {}: {}", input_dir.display(), e);
                run.aborted = Some(e.into());
                return run;
            }
        };

        if entry.file_type().is_dir() || !is_video_file(entry.path()) {
            continue;
        }

        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();
        info!("Uploading video: {}", file_name);

        let request = UploadRequest::new(space_name, path, &file_name)
            .with_remote_name(Some(file_name.clone()));

        match vod.upload_media(&request).await {
            Err(e) if e.is_credential() => {
                error!("Credentials rejected while uploading {}: {}", file_name, e);
                run.aborted = Some(e);
                return run;
            }
            Err(e) => {
                warn!("Upload of {} failed: {}", file_name, e);
                run.outcomes.push(UploadOutcome::upload_failed(file_name, e));
            }
            Ok(media) => {
                let publish = vod.publish_video(&media.vid).await;
                match &publish {
                    Ok(_) => info!("Published {} as {}", file_name, media.vid),
                    Err(e) => warn!("Publishing {} ({}) failed: {}", file_name, media.vid, e),
                }
                run.outcomes
                    .push(UploadOutcome::uploaded(file_name, media.vid, publish));

                if let Err(e) = move_file(path, output_dir) {
                    error!("Failed to move {}: {}", path.display(), e);
                    run.aborted = Some(e);
                    return run;
                }
            }
        }
    }

    run
}
