//! Cloud provider error types

use thiserror::Error;

/// Cloud provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    /// Structured fault returned by the remote service
    #[error("服务器错误: {code} - {message}")]
    Api {
        code: String,
        message: String,
        request_id: Option<String>,
    },

    /// The remote could not be reached at all
    #[error("客户端错误: {0}")]
    Transport(String),

    #[error("返回数据格式异常: {0}")]
    MalformedResponse(String),

    #[error("无效的区域ID: {0}")]
    InvalidRegion(String),

    #[error("参数错误: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The three failure classes every provider operation recovers from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultClass {
    Remote,
    Transport,
    Generic,
}

impl CloudError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        CloudError::Api {
            code: code.into(),
            message: message.into(),
            request_id: None,
        }
    }

    pub fn class(&self) -> FaultClass {
        match self {
            CloudError::Api { .. } => FaultClass::Remote,
            CloudError::Transport(_) => FaultClass::Transport,
            _ => FaultClass::Generic,
        }
    }

    /// Machine-readable code of a remote fault
    pub fn code(&self) -> Option<&str> {
        match self {
            CloudError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_classes() {
        assert_eq!(CloudError::api("Forbidden", "no").class(), FaultClass::Remote);
        assert_eq!(
            CloudError::Transport("connection refused".into()).class(),
            FaultClass::Transport
        );
        assert_eq!(
            CloudError::MalformedResponse("missing Regions".into()).class(),
            FaultClass::Generic
        );
    }

    #[test]
    fn test_api_display_and_code() {
        let err = CloudError::api("InvalidInstanceId.NotFound", "The specified instance does not exist");
        assert_eq!(err.code(), Some("InvalidInstanceId.NotFound"));
        assert!(err.to_string().contains("InvalidInstanceId.NotFound"));
        assert_eq!(CloudError::Transport("x".into()).code(), None);
    }
}
