//! ACS3-HMAC-SHA256 request signing
//!
//! Requests are sent as `POST https://{host}/?{query}` with an empty body.
//! The signature covers the method, the canonical query, the `host` and
//! `x-acs-*` headers, and the SHA-256 of the (empty) payload.

use ecsflow_cloud::{CloudError, Result, RpcRequest};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const ALGORITHM: &str = "ACS3-HMAC-SHA256";

const METHOD: &str = "POST";

/// Everything except RFC 3986 unreserved characters gets `%XX` encoded
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

type HmacSha256 = Hmac<Sha256>;

/// A request ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub url: String,
    /// Lowercase header names, including `authorization`
    pub headers: BTreeMap<String, String>,
}

/// Signs requests with one AccessKey pair
#[derive(Clone)]
pub struct Signer {
    access_key_id: String,
    access_key_secret: String,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

impl Signer {
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
        }
    }

    /// Sign `request` with an explicit timestamp and nonce
    ///
    /// `date` must be UTC in `%Y-%m-%dT%H:%M:%SZ` form.
    pub fn sign(&self, request: &RpcRequest, date: &str, nonce: &str) -> Result<SignedRequest> {
        let query = canonical_query(&request.params);
        let payload_hash = sha256_hex(b"");

        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), request.host.clone());
        headers.insert("x-acs-action".to_string(), request.action.clone());
        headers.insert("x-acs-content-sha256".to_string(), payload_hash.clone());
        headers.insert("x-acs-date".to_string(), date.to_string());
        headers.insert("x-acs-signature-nonce".to_string(), nonce.to_string());
        headers.insert("x-acs-version".to_string(), request.version.clone());

        let canonical = canonical_request(&query, &headers, &payload_hash);
        let string_to_sign = format!("{}\n{}", ALGORITHM, sha256_hex(canonical.as_bytes()));
        let signature = self.hmac_hex(&string_to_sign)?;

        let signed_headers = signed_header_list(&headers);
        headers.insert(
            "authorization".to_string(),
            format!(
                "{} Credential={},SignedHeaders={},Signature={}",
                ALGORITHM, self.access_key_id, signed_headers, signature
            ),
        );

        let url = if query.is_empty() {
            format!("https://{}/", request.host)
        } else {
            format!("https://{}/?{}", request.host, query)
        };

        Ok(SignedRequest { url, headers })
    }

    fn hmac_hex(&self, data: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.access_key_secret.as_bytes())
            .map_err(|e| CloudError::InvalidInput(format!("AccessKeySecret: {}", e)))?;
        mac.update(data.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// RFC 3986 percent-encoding
pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, RFC3986).to_string()
}

/// Encoded `key=value` pairs sorted by encoded key, joined with `&`
pub fn canonical_query(params: &BTreeMap<String, String>) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn canonical_request(query: &str, headers: &BTreeMap<String, String>, payload_hash: &str) -> String {
    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{}:{}\n", k, v.trim()))
        .collect();

    format!(
        "{}\n/\n{}\n{}\n{}\n{}",
        METHOD,
        query,
        canonical_headers,
        signed_header_list(headers),
        payload_hash
    )
}

fn signed_header_list(headers: &BTreeMap<String, String>) -> String {
    headers.keys().cloned().collect::<Vec<_>>().join(";")
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
