//! HTTPS transport for Aliyun RPC-style APIs

use crate::signer::Signer;
use async_trait::async_trait;
use ecsflow_cloud::{CloudError, Result, RpcRequest, RpcTransport};
use serde_json::Value;

const USER_AGENT: &str = concat!("ecsflow/", env!("CARGO_PKG_VERSION"));

/// Signs every request and sends it with reqwest
pub struct AliyunHttpTransport {
    client: reqwest::Client,
    signer: Signer,
}

impl AliyunHttpTransport {
    pub fn new(access_key_id: &str, access_key_secret: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CloudError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            signer: Signer::new(access_key_id, access_key_secret),
        })
    }
}

#[async_trait]
impl RpcTransport for AliyunHttpTransport {
    async fn invoke(&self, request: &RpcRequest) -> Result<Value> {
        let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let signed = self.signer.sign(request, &date, &nonce)?;

        tracing::debug!(action = %request.action, host = %request.host, "Sending request");

        let mut builder = self.client.post(&signed.url);
        for (name, value) in &signed.headers {
            // reqwest derives Host from the URL
            if name != "host" {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CloudError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CloudError::Transport(e.to_string()))?;

        tracing::debug!(action = %request.action, status, "Received response");
        decode_response(status, &body)
    }
}

/// Turn an HTTP status and body into a JSON value or a typed fault
pub fn decode_response(status: u16, body: &str) -> Result<Value> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        if let Some(fault) = parsed.as_ref().and_then(fault_from_body) {
            return Err(fault);
        }
        return Err(CloudError::Api {
            code: format!("HTTP{}", status),
            message: snippet(body),
            request_id: None,
        });
    }

    let value = parsed.ok_or_else(|| CloudError::MalformedResponse(snippet(body)))?;

    if value.get("Success") == Some(&Value::Bool(false)) {
        if let Some(fault) = fault_from_body(&value) {
            return Err(fault);
        }
    }

    Ok(value)
}

fn fault_from_body(body: &Value) -> Option<CloudError> {
    let code = body.get("Code")?.as_str()?;
    let message = body
        .get("Message")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let request_id = body
        .get("RequestId")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(CloudError::Api {
        code: code.to_string(),
        message: message.to_string(),
        request_id,
    })
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "(empty body)".to_string();
    }
    match trimmed.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body() {
        let value = decode_response(200, r#"{"RequestId":"r-1","TotalCount":0}"#).unwrap();
        assert_eq!(value["RequestId"], "r-1");
    }

    #[test]
    fn test_structured_fault() {
        let err = decode_response(
            404,
            r#"{"RequestId":"r-2","Code":"InvalidInstanceId.NotFound","Message":"The specified InstanceId does not exist."}"#,
        )
        .unwrap_err();

        match err {
            CloudError::Api {
                code,
                message,
                request_id,
            } => {
                assert_eq!(code, "InvalidInstanceId.NotFound");
                assert!(message.contains("does not exist"));
                assert_eq!(request_id.as_deref(), Some("r-2"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unsuccessful_2xx_body() {
        let err = decode_response(
            200,
            r#"{"Success":false,"Code":"NotApplicable","Message":"no"}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), Some("NotApplicable"));
    }

    #[test]
    fn test_http_status_without_fault_body() {
        let err = decode_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.code(), Some("HTTP502"));
    }

    #[test]
    fn test_malformed_success_body() {
        let err = decode_response(200, "not json").unwrap_err();
        assert!(matches!(err, CloudError::MalformedResponse(_)));
    }
}
