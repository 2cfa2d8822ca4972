//! HMAC-SHA256 request signing for the Volcengine OpenAPI.
//!
//! The scheme follows the familiar V4 layout: a canonical request is hashed
//! into a string-to-sign, which is signed with a key derived from the secret
//! through the date, region and service.

use crate::models::Credentials;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const SERVICE: &str = "vod";
const ALGORITHM: &str = "HMAC-SHA256";
const SIGNED_HEADERS: &str = "host;x-content-sha256;x-date";

/// Header values to attach to a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub x_date: String,
    pub content_sha256: String,
    pub authorization: String,
}

/// Everything about a request that takes part in the signature.
#[derive(Debug)]
pub struct RequestParts<'a> {
    pub method: &'a str,
    pub host: &'a str,
    pub path: &'a str,
    /// Already canonical, see [`canonical_query`].
    pub query: &'a str,
    pub body: &'a [u8],
}

/// Sort parameters by key and RFC 3986 encode them.
pub fn canonical_query(params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    encoded.sort();

    encoded
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

fn signing_key(secret_key: &str, short_date: &str, region: &str) -> Vec<u8> {
    let k_date = hmac_sha256(secret_key.as_bytes(), short_date);
    let k_region = hmac_sha256(&k_date, region);
    let k_service = hmac_sha256(&k_region, SERVICE);
    hmac_sha256(&k_service, "request")
}

pub fn sign(
    credentials: &Credentials,
    region: &str,
    request: &RequestParts<'_>,
    now: DateTime<Utc>,
) -> SignedHeaders {
    let x_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let short_date = now.format("%Y%m%d").to_string();
    let content_sha256 = sha256_hex(request.body);

    let canonical_headers = format!(
        "host:{}\nx-content-sha256:{}\nx-date:{}\n",
        request.host, content_sha256, x_date
    );
    let canonical_request = [
        request.method,
        request.path,
        request.query,
        canonical_headers.as_str(),
        SIGNED_HEADERS,
        content_sha256.as_str(),
    ]
    .join("\n");

    let scope = format!("{}/{}/{}/request", short_date, region, SERVICE);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        x_date,
        scope,
        sha256_hex(canonical_request.as_bytes())
    );

    let key = signing_key(&credentials.secret_key, &short_date, region);
    let signature = hex::encode(hmac_sha256(&key, &string_to_sign));

    SignedHeaders {
        authorization: format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, credentials.access_key, scope, SIGNED_HEADERS, signature
        ),
        x_date,
        content_sha256,
    }
}
