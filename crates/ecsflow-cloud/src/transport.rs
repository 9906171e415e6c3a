//! RPC transport abstraction
//!
//! Every remote call made by a provider client is an RPC-style action sent to
//! a service host under a fixed API version. The transport owns the wire
//! details (signing, HTTP, fault decoding); provider clients only build
//! requests and normalize the JSON they get back.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One RPC action addressed to a service host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcRequest {
    /// Service host, e.g. `ecs.cn-hangzhou.aliyuncs.com`
    pub host: String,

    /// API version of the service, e.g. `2014-05-26`
    pub version: String,

    /// Action name, e.g. `DescribeRegions`
    pub action: String,

    /// Flattened request parameters, kept sorted for signing
    pub params: BTreeMap<String, String>,
}

impl RpcRequest {
    pub fn new(
        host: impl Into<String>,
        version: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            version: version.into(),
            action: action.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Add a parameter only when a value is present
    pub fn param_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Look up a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Transport that executes RPC requests against a remote service
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Execute one request and return the decoded response body
    async fn invoke(&self, request: &RpcRequest) -> Result<serde_json::Value>;
}

#[async_trait]
impl<T: RpcTransport + ?Sized> RpcTransport for Arc<T> {
    async fn invoke(&self, request: &RpcRequest) -> Result<serde_json::Value> {
        (**self).invoke(request).await
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockReply, MockTransport};

#[cfg(any(test, feature = "mock"))]
mod mock {
    use super::*;
    use crate::error::CloudError;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Scripted outcome of one call
    #[derive(Debug, Clone)]
    pub enum MockReply {
        Json(serde_json::Value),
        Fault { code: String, message: String },
        Transport(String),
    }

    impl MockReply {
        fn into_result(self) -> Result<serde_json::Value> {
            match self {
                MockReply::Json(value) => Ok(value),
                MockReply::Fault { code, message } => Err(CloudError::api(code, message)),
                MockReply::Transport(message) => Err(CloudError::Transport(message)),
            }
        }
    }

    /// In-memory transport answering from canned replies per action
    ///
    /// Replies queued for an action are consumed in order; the last one is
    /// sticky and answers every further call. Every request is recorded.
    #[derive(Default)]
    pub struct MockTransport {
        replies: Mutex<HashMap<String, VecDeque<MockReply>>>,
        calls: Mutex<Vec<RpcRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_reply(self, action: &str, value: serde_json::Value) -> Self {
            self.push(action, MockReply::Json(value));
            self
        }

        pub fn with_fault(self, action: &str, code: &str, message: &str) -> Self {
            self.push(
                action,
                MockReply::Fault {
                    code: code.to_string(),
                    message: message.to_string(),
                },
            );
            self
        }

        pub fn with_transport_error(self, action: &str, message: &str) -> Self {
            self.push(action, MockReply::Transport(message.to_string()));
            self
        }

        fn push(&self, action: &str, reply: MockReply) {
            let mut replies = self.replies.lock().unwrap_or_else(|e| e.into_inner());
            replies.entry(action.to_string()).or_default().push_back(reply);
        }

        /// Every request seen so far
        pub fn calls(&self) -> Vec<RpcRequest> {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        /// Requests seen for one action
        pub fn calls_for(&self, action: &str) -> Vec<RpcRequest> {
            self.calls()
                .into_iter()
                .filter(|c| c.action == action)
                .collect()
        }

        pub fn call_count(&self, action: &str) -> usize {
            self.calls_for(action).len()
        }
    }

    #[async_trait]
    impl RpcTransport for MockTransport {
        async fn invoke(&self, request: &RpcRequest) -> Result<serde_json::Value> {
            self.calls
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(request.clone());

            let reply = {
                let mut replies = self.replies.lock().unwrap_or_else(|e| e.into_inner());
                match replies.get_mut(&request.action) {
                    Some(queue) if queue.len() > 1 => queue.pop_front(),
                    Some(queue) => queue.front().cloned(),
                    None => None,
                }
            };

            match reply {
                Some(reply) => reply.into_result(),
                None => Err(CloudError::api(
                    "MockNotScripted",
                    format!("no reply scripted for {}", request.action),
                )),
            }
        }
    }
}
