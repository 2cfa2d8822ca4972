//! Batch uploader for a video-on-demand platform.
//!
//! Walks a directory of videos, uploads each one to a VOD space, publishes
//! it, and records per-file outcomes in a `results.ini` report. A second
//! binary uploads and publishes a single file.

pub mod batch;
pub mod error;
pub mod models;
pub mod report;
pub mod single;
pub mod vod;

pub use error::{Error, ErrorKind, Result};
