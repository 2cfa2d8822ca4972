//! `results.ini` writer and reader.
//!
//! One section per processed file, keyed by file name, with `vid`,
//! `published` and an optional `error` key.

use crate::models::UploadOutcome;
use crate::Result;
use ini::Ini;
use std::path::Path;
use tracing::info;

pub const RESULTS_FILE_NAME: &str = "results.ini";

/// One section of a results file as read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub file_name: String,
    pub vid: String,
    pub published: bool,
    pub error: Option<String>,
}

impl From<&UploadOutcome> for ReportEntry {
    fn from(outcome: &UploadOutcome) -> Self {
        Self {
            file_name: outcome.file_name.clone(),
            vid: outcome.vid.clone(),
            published: outcome.published,
            error: outcome.error_message(),
        }
    }
}

/// Section headers end at the first `]`, so that byte (and the escape
/// character itself) is percent-encoded in section names.
fn encode_section(file_name: &str) -> String {
    file_name.replace('%', "%25").replace(']', "%5D")
}

fn decode_section(name: &str) -> String {
    urlencoding::decode(name)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| name.to_string())
}

/// Write every outcome to `path`, replacing whatever was there.
pub fn write_results(outcomes: &[UploadOutcome], path: &Path) -> Result<()> {
    info!("Creating {}", path.display());

    let mut conf = Ini::new();
    for entry in outcomes.iter().map(ReportEntry::from) {
        let section = encode_section(&entry.file_name);
        conf.with_section(Some(section.as_str()))
            .set("vid", entry.vid.as_str())
            .set("published", entry.published.to_string());

        if let Some(error) = &entry.error {
            conf.with_section(Some(section.as_str()))
                .set("error", error.as_str());
        }
    }

    conf.write_to_file(path)?;
    Ok(())
}

pub fn read_results(path: &Path) -> Result<Vec<ReportEntry>> {
    let conf = Ini::load_from_file(path)?;

    Ok(conf
        .iter()
        .filter_map(|(section, props)| {
            section.map(|name| ReportEntry {
                file_name: decode_section(name),
                vid: props.get("vid").unwrap_or_default().to_string(),
                published: props.get("published") == Some("true"),
                error: props
                    .get("error")
                    .filter(|e| !e.is_empty())
                    .map(str::to_string),
            })
        })
        .collect())
}
