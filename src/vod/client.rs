use super::signer::{self, RequestParts};
use super::types::{
    ApiResponse, ApplyUploadInfoResult, CommitUploadInfoResult, UploadAddress, UploadFunction,
};
use super::{UploadRequest, UploadedMedia, VodService, PUBLISHED_STATUS};
use crate::models::{Credentials, VodConfig};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

const API_VERSION: &str = "2020-08-01";

/// HTTP client for the VOD OpenAPI and its upload gateway.
pub struct VodClient {
    client: Client,
    credentials: Credentials,
    region: String,
    base_url: String,
}

impl VodClient {
    pub fn new(config: VodConfig) -> Self {
        Self::new_with_client(config, Client::new())
    }

    pub fn new_with_client(config: VodConfig, client: Client) -> Self {
        Self {
            client,
            credentials: config.credentials,
            region: config.region,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn host_header(&self) -> Result<String> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid VOD host {}: {}", self.base_url, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::Config(format!("VOD host {} has no host name", self.base_url)))?;

        Ok(match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }

    /// Signed GET against `/?Action=...`; unwraps the response envelope.
    async fn call<Resp: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<Resp>> {
        let mut all_params = vec![("Action", action), ("Version", API_VERSION)];
        all_params.extend_from_slice(params);
        let query = signer::canonical_query(&all_params);
        let host = self.host_header()?;

        let signed = signer::sign(
            &self.credentials,
            &self.region,
            &RequestParts {
                method: "GET",
                host: &host,
                path: "/",
                query: &query,
                body: b"",
            },
            Utc::now(),
        );

        let url = format!("{}/?{}", self.base_url, query);
        let response = self
            .client
            .get(&url)
            .header("X-Date", &signed.x_date)
            .header("X-Content-Sha256", &signed.content_sha256)
            .header("Authorization", &signed.authorization)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send {} request to VOD: {}", action, e);
                e
            })?;

        let status = response.status();
        let body = response.text().await?;

        // Error metadata wins over whatever shape `Result` has.
        let envelope = match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                tracing::error!("Failed to parse VOD {} response: {}\nBody: {}", action, e, body);
                return Err(Error::MalformedResponse(format!(
                    "{} response could not be parsed: {}",
                    action, e
                )));
            }
            Err(_) => {
                tracing::error!("VOD {} failed (status {}): {}", action, status, body);
                return Err(Error::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                });
            }
        };

        if let Some(err) = envelope.response_metadata.error {
            tracing::warn!(
                "VOD {} returned {} (request {}): {}",
                action,
                err.code,
                envelope.response_metadata.request_id,
                err.message
            );
            return Err(Error::service(err.code, err.message));
        }
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        envelope
            .result
            .map(serde_json::from_value::<Resp>)
            .transpose()
            .map_err(|e| {
                tracing::error!("Failed to parse VOD {} result: {}\nBody: {}", action, e, body);
                Error::MalformedResponse(format!("{} result could not be parsed: {}", action, e))
            })
    }

    async fn apply_upload_info(&self, request: &UploadRequest) -> Result<UploadAddress> {
        let mut params = vec![
            ("SpaceName", request.space_name.as_str()),
            ("FileType", "media"),
        ];
        if let Some(name) = request.remote_name.as_deref() {
            params.push(("FileName", name));
        }

        let result: ApplyUploadInfoResult = self
            .call("ApplyUploadInfo", &params)
            .await?
            .ok_or_else(|| Error::MalformedResponse("ApplyUploadInfo returned no result".into()))?;

        Ok(result.data.upload_address)
    }

    /// PUT the file body straight to the storage gateway.
    async fn put_object(&self, address: &UploadAddress, data: Vec<u8>) -> Result<String> {
        let store = address
            .store_infos
            .first()
            .ok_or_else(|| Error::MalformedResponse("No store info in upload address".into()))?;
        let host = address
            .upload_hosts
            .first()
            .ok_or_else(|| Error::MalformedResponse("No upload host in upload address".into()))?;

        let base = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host)
        };
        let url = format!("{}/{}", base, store.store_uri);
        let crc = format!("{:08x}", crc32fast::hash(&data));

        let response = self
            .client
            .put(&url)
            .header("Authorization", &store.auth)
            .header("Content-CRC32", crc)
            .body(data)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to upload to {}: {}", url, e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            tracing::error!("Upload gateway error (status {}): {}", status, body);
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(store.store_uri.clone())
    }

    async fn commit_upload_info(
        &self,
        request: &UploadRequest,
        session_key: &str,
    ) -> Result<CommitUploadInfoResult> {
        let functions =
            serde_json::to_string(&[UploadFunction::add_option_info(&request.title)])?;

        self.call(
            "CommitUploadInfo",
            &[
                ("SpaceName", request.space_name.as_str()),
                ("SessionKey", session_key),
                ("Functions", functions.as_str()),
            ],
        )
        .await?
        .ok_or_else(|| Error::MalformedResponse("CommitUploadInfo returned no result".into()))
    }
}

#[async_trait]
impl VodService for VodClient {
    async fn upload_media(&self, request: &UploadRequest) -> Result<UploadedMedia> {
        let address = self.apply_upload_info(request).await?;
        let data = tokio::fs::read(&request.file_path).await?;
        let store_uri = self.put_object(&address, data).await?;
        let committed = self
            .commit_upload_info(request, &address.session_key)
            .await?;

        let file_name = committed
            .data
            .source_info
            .map(|info| info.file_name)
            .filter(|name| !name.is_empty())
            .or_else(|| request.remote_name.clone())
            .unwrap_or(store_uri);

        Ok(UploadedMedia {
            vid: committed.data.vid,
            file_name,
        })
    }

    async fn publish_video(&self, vid: &str) -> Result<bool> {
        self.call::<serde_json::Value>(
            "UpdateMediaPublishStatus",
            &[("Vid", vid), ("Status", PUBLISHED_STATUS)],
        )
        .await?;
        Ok(true)
    }
}
