//! Aliyun provider for ecsflow
//!
//! Talks to three Aliyun services over their RPC-style OpenAPI:
//!
//! - **ECS** (compute): regions, prices, security groups, instance types,
//!   launch templates, instance lifecycle and status
//! - **VPC** (networking): vswitches
//! - **BSS** (billing): account balance
//!
//! Requests are signed with ACS3-HMAC-SHA256 and sent over HTTPS by
//! [`AliyunHttpTransport`]. Tests swap in any other [`RpcTransport`].
//!
//! # Example
//!
//! ```ignore
//! use ecsflow_cloud_aliyun::AliyunClient;
//!
//! let mut client = AliyunClient::connect(&key_id, &key_secret, "cn-hangzhou")?;
//!
//! if let Some(balance) = client.account_balance().await {
//!     println!("{}", balance.available_amount);
//! }
//!
//! client.set_region("cn-beijing");
//! let instances = client.describe_instances("").await;
//! ```
//!
//! [`RpcTransport`]: ecsflow_cloud::RpcTransport

pub mod client;
pub mod endpoint;
pub mod http;
pub mod signer;
pub mod wire;

pub use client::{AliyunClient, fault_hint};
pub use endpoint::{DEFAULT_REGION, ServiceConnection, ServiceGroup, validate_region};
pub use http::AliyunHttpTransport;
pub use signer::Signer;
