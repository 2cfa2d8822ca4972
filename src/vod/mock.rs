use super::{UploadRequest, UploadedMedia, VodService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory [`VodService`] that fails on demand, keyed by upload title.
#[derive(Clone)]
pub struct MockVodClient {
    upload_failures: Arc<Mutex<HashMap<String, String>>>,
    publish_failures: Arc<Mutex<HashMap<String, String>>>,
    uploads: Arc<Mutex<Vec<UploadRequest>>>,
    titles_by_vid: Arc<Mutex<HashMap<String, String>>>,
    published: Arc<Mutex<Vec<String>>>,
}

impl MockVodClient {
    pub fn new() -> Self {
        Self {
            upload_failures: Arc::new(Mutex::new(HashMap::new())),
            publish_failures: Arc::new(Mutex::new(HashMap::new())),
            uploads: Arc::new(Mutex::new(Vec::new())),
            titles_by_vid: Arc::new(Mutex::new(HashMap::new())),
            published: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make uploads titled `title` fail with the remote error `code`.
    pub fn with_upload_failure(self, title: &str, code: &str) -> Self {
        self.upload_failures
            .lock()
            .unwrap()
            .insert(title.to_string(), code.to_string());
        self
    }

    /// Make publishing the media uploaded as `title` fail with `code`.
    pub fn with_publish_failure(self, title: &str, code: &str) -> Self {
        self.publish_failures
            .lock()
            .unwrap()
            .insert(title.to_string(), code.to_string());
        self
    }

    pub fn get_upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn get_uploads(&self) -> Vec<UploadRequest> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn get_published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

impl Default for MockVodClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VodService for MockVodClient {
    async fn upload_media(&self, request: &UploadRequest) -> Result<UploadedMedia> {
        let count = {
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(request.clone());
            uploads.len()
        };

        if let Some(code) = self.upload_failures.lock().unwrap().get(&request.title) {
            return Err(Error::service(code.clone(), "mock upload failure"));
        }

        let vid = format!("v0mock{:04}", count);
        self.titles_by_vid
            .lock()
            .unwrap()
            .insert(vid.clone(), request.title.clone());

        Ok(UploadedMedia {
            vid,
            file_name: request
                .remote_name
                .clone()
                .unwrap_or_else(|| request.title.clone()),
        })
    }

    async fn publish_video(&self, vid: &str) -> Result<bool> {
        let title = self
            .titles_by_vid
            .lock()
            .unwrap()
            .get(vid)
            .cloned()
            .ok_or_else(|| Error::service("ResourceNotFound", format!("unknown vid {}", vid)))?;

        if let Some(code) = self.publish_failures.lock().unwrap().get(&title) {
            return Err(Error::service(code.clone(), "mock publish failure"));
        }

        self.published.lock().unwrap().push(vid.to_string());
        Ok(true)
    }
}
