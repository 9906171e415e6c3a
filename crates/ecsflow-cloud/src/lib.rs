//! ecsflow cloud model
//!
//! Provider-neutral pieces shared by the console and the provider clients:
//! normalized response types, the RPC transport seam, instance and price
//! parameters, and the bounded status poll.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 ecsflow console                  │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 ecsflow-cloud                    │
//! │  ┌──────────────┐  ┌──────────────┐             │
//! │  │ model / spec │  │  poll loop   │             │
//! │  └──────────────┘  └──────────────┘             │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        trait RpcTransport { ... }         │   │
//! │  └──────────────────────────────────────────┘   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │    aliyun     │
//!           │   provider    │
//!           └───────────────┘
//! ```

pub mod error;
pub mod model;
pub mod poll;
pub mod price;
pub mod spec;
pub mod transport;

// Re-exports
pub use error::{CloudError, FaultClass, Result};
pub use model::*;
pub use poll::{PollConfig, PollOutcome, Probe, poll_until};
pub use price::{PriceComponent, PriceQuery, PriceQuote, format_price};
pub use spec::{InstanceSpec, InstanceSpecBuilder};
pub use transport::{RpcRequest, RpcTransport};

#[cfg(any(test, feature = "mock"))]
pub use transport::{MockReply, MockTransport};
