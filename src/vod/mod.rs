//! VOD platform integration for uploading and publishing media
//!
//! Wraps the Volcengine VOD OpenAPI behind [`VodService`] so the batch and
//! single-file drivers share one upload/publish abstraction.

pub mod client;
pub mod mock;
pub mod signer;
pub mod types;

pub use client::VodClient;
pub use mock::MockVodClient;

use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Status string sent when publishing media.
pub const PUBLISHED_STATUS: &str = "Published";

/// One upload, built per file and dropped after the call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub space_name: String,
    pub file_path: PathBuf,
    pub title: String,
    /// Remote file name; the service picks one when `None`.
    pub remote_name: Option<String>,
}

impl UploadRequest {
    pub fn new(space_name: &str, file_path: impl Into<PathBuf>, title: &str) -> Self {
        Self {
            space_name: space_name.to_string(),
            file_path: file_path.into(),
            title: title.to_string(),
            remote_name: None,
        }
    }

    pub fn with_remote_name(mut self, remote_name: Option<String>) -> Self {
        self.remote_name = remote_name.filter(|name| !name.is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub vid: String,
    /// Remote file name as resolved by the service.
    pub file_name: String,
}

#[async_trait]
pub trait VodService: Send + Sync {
    async fn upload_media(&self, request: &UploadRequest) -> Result<UploadedMedia>;
    async fn publish_video(&self, vid: &str) -> Result<bool>;
}
