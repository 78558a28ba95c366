//! Typed async client for the [toncenter](https://toncenter.com/api/v2/) HTTP API
//! of the TON blockchain.
//!
//! Every endpoint answers with the same `{ok, error, result}` envelope. The
//! client unwraps it once, in one place, and hands back either the typed
//! result or a single [`Error`] telling apart local parameter problems,
//! transport failures and errors reported by the server.
//!
//! # Features
//!
//! - **[`types`] and [`params`]**: response types, request option sets and the
//!   exact [`Amount`] decimal. Available with no additional features.
//! - **`client` module** (enabled by default): an async client built on `reqwest`.
//!
//! # Quick start
//!
//! ```no_run
//! use toncenter_client::{TonCenterClient, TransactionsRequest};
//!
//! #[tokio::main]
//! async fn main() -> toncenter_client::Result<()> {
//!     let client = TonCenterClient::mainnet();
//!     let address = "EQCD39VS5jcptHL8vMjEXrzGaRcCVYto7HUn4bpAOg8xqB2N";
//!
//!     let balance = client.balance(address).await?;
//!     println!("Balance: {} TON", balance.to_tons());
//!
//!     let page = client
//!         .transactions(address, &TransactionsRequest::new().limit(10))
//!         .await?;
//!     println!("Fetched {} transactions", page.len());
//!     Ok(())
//! }
//! ```

mod amount;
pub mod error;
pub mod params;
pub mod types;

#[cfg(feature = "client")]
mod envelope;
#[cfg(feature = "client")]
mod transport;

#[cfg(feature = "client")]
pub mod client;

pub use amount::{Amount, NANOTONS_PER_TON};
pub use error::{ApiError, Error, InvalidParameters, Result, TransportError, TransportFailure};
pub use params::{
    BlockHeaderRequest, BlockTransactionsRequest, LookupBlockRequest, QueryParameters,
    QueryParams, TransactionsRequest,
};

#[cfg(feature = "client")]
pub use client::TonCenterClient;
#[cfg(feature = "client")]
pub use transport::API_KEY_HEADER;

/// Re-exported decimal type from `rust_decimal`.
pub use rust_decimal::Decimal;

pub use types::*;
