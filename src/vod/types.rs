//! VOD OpenAPI request/response payloads.

use serde::{Deserialize, Serialize};

/// Envelope shared by every OpenAPI response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiResponse<T> {
    pub response_metadata: ResponseMetadata,
    pub result: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseMetadata {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub action: String,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplyUploadInfoResult {
    pub data: ApplyUploadInfoData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplyUploadInfoData {
    pub upload_address: UploadAddress,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadAddress {
    #[serde(default)]
    pub store_infos: Vec<StoreInfo>,
    #[serde(default)]
    pub upload_hosts: Vec<String>,
    pub session_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoreInfo {
    pub store_uri: String,
    pub auth: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommitUploadInfoResult {
    pub data: CommitUploadInfoData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommitUploadInfoData {
    pub vid: String,
    pub source_info: Option<SourceInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceInfo {
    #[serde(default)]
    pub file_name: String,
}

/// Post-upload function attached to `CommitUploadInfo`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadFunction {
    pub name: String,
    pub input: OptionInfo,
}

/// Media metadata applied through the `AddOptionInfo` function.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OptionInfo {
    pub title: String,
}

impl UploadFunction {
    pub fn add_option_info(title: &str) -> Self {
        Self {
            name: "AddOptionInfo".to_string(),
            input: OptionInfo {
                title: title.to_string(),
            },
        }
    }
}
