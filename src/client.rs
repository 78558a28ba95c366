//! Async client for the toncenter HTTP API.

use crate::amount::Amount;
use crate::envelope;
use crate::error::Result;
use crate::params::{
    BlockHeaderRequest, BlockTransactionsRequest, LookupBlockRequest, QueryParameters,
    QueryParams, TransactionsRequest,
};
use crate::transport::HttpTransport;
use crate::types::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Base URL of the public mainnet API.
pub const MAINNET_URL: &str = "https://toncenter.com/api/v2/";

/// Base URL of the public testnet API.
pub const TESTNET_URL: &str = "https://testnet.toncenter.com/api/v2/";

/// Environment variable read by [`TonCenterClient::from_env`] for the base URL.
pub const API_URL_ENV: &str = "TONCENTER_API_URL";

/// Environment variable read by [`TonCenterClient::from_env`] for the API key.
pub const API_KEY_ENV: &str = "TONCENTER_API_KEY";

#[derive(Debug, Deserialize)]
struct Shards {
    shards: Vec<BlockId>,
}

/// Async client for the toncenter HTTP API.
///
/// The client is immutable once built and cheap to clone; clones share the
/// underlying connection pool. Every method issues exactly one GET request.
///
/// # Example
///
/// ```no_run
/// use toncenter_client::TonCenterClient;
///
/// #[tokio::main]
/// async fn main() -> toncenter_client::Result<()> {
///     let client = TonCenterClient::mainnet();
///     let info = client.masterchain_info().await?;
///     println!("Masterchain seqno: {}", info.last.seqno);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct TonCenterClient {
    transport: HttpTransport,
}

impl TonCenterClient {
    /// Create an anonymous client for a custom base URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            transport: HttpTransport::new(url),
        }
    }

    /// Create an anonymous client for mainnet.
    pub fn mainnet() -> Self {
        Self::new(MAINNET_URL)
    }

    /// Create an anonymous client for testnet.
    pub fn testnet() -> Self {
        Self::new(TESTNET_URL)
    }

    /// Create a client from `TONCENTER_API_URL` (default: mainnet) and
    /// `TONCENTER_API_KEY` (default: anonymous).
    pub fn from_env() -> Self {
        let url = std::env::var(API_URL_ENV).unwrap_or_else(|_| MAINNET_URL.to_owned());
        Self::new(url).with_api_key(std::env::var(API_KEY_ENV).unwrap_or_default())
    }

    /// Send `X-API-Key` with every request. An empty key keeps the client anonymous.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.transport.set_api_key(Some(api_key.into()));
        self
    }

    /// Use a pre-configured `reqwest` client, for example one with a timeout
    /// or a proxy.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.transport.set_http_client(http);
        self
    }

    /// Base URL requests are sent to, always ending in `/`.
    pub fn url(&self) -> &str {
        self.transport.base_url()
    }

    async fn call<R: DeserializeOwned>(&self, path: &'static str, query: QueryParams) -> Result<R> {
        tracing::debug!(path, params = query.len(), "sending toncenter request");

        let response = self
            .transport
            .get(path, &query)
            .await
            .inspect_err(|err| tracing::debug!(path, error = %err, "toncenter request failed"))?;
        tracing::trace!(
            path,
            status = response.status,
            body = %response.body,
            "toncenter response"
        );

        let result = envelope::resolve(response.status, &response.body);
        match &result {
            Ok(_) => tracing::debug!(path, "toncenter call succeeded"),
            Err(err) => tracing::debug!(path, error = %err, "toncenter call failed"),
        }
        result
    }

    // ── Accounts ─────────────────────────────────────────────────

    /// Returns the balance of an address in nanotons.
    pub async fn balance(&self, address: &str) -> Result<Amount> {
        self.call("getAddressBalance", address_query(address)).await
    }

    /// Returns the lifecycle state of an address.
    pub async fn address_state(&self, address: &str) -> Result<AddressState> {
        self.call("getAddressState", address_query(address)).await
    }

    /// Returns basic information about an address: balance, code, data and
    /// last transaction.
    pub async fn address_information(&self, address: &str) -> Result<AddressInformation> {
        self.call("getAddressInformation", address_query(address)).await
    }

    /// Like [`address_information`](Self::address_information), but also
    /// parses the state of known contract types.
    pub async fn extended_address_information(
        &self,
        address: &str,
    ) -> Result<ExtendedAddressInformation> {
        self.call("getExtendedAddressInformation", address_query(address)).await
    }

    /// Returns wallet information. Recognizes more wallet contract versions
    /// than [`extended_address_information`](Self::extended_address_information).
    pub async fn wallet_information(&self, address: &str) -> Result<WalletInformation> {
        self.call("getWalletInformation", address_query(address)).await
    }

    // ── Address formats ──────────────────────────────────────────

    /// Converts a raw address (`workchain:hex`) to the user-friendly form.
    pub async fn pack_address(&self, raw_address: &str) -> Result<String> {
        self.call("packAddress", address_query(raw_address)).await
    }

    /// Converts a user-friendly address to the raw form.
    pub async fn unpack_address(&self, address: &str) -> Result<String> {
        self.call("unpackAddress", address_query(address)).await
    }

    // ── Blocks ───────────────────────────────────────────────────

    /// Returns the up-to-date masterchain state.
    pub async fn masterchain_info(&self) -> Result<MasterchainInfo> {
        self.call("getMasterChainInfo", QueryParams::new()).await
    }

    /// Returns the consensus block and the time it was last updated.
    pub async fn consensus_block(&self) -> Result<ConsensusBlock> {
        self.call("getConsensusBlock", QueryParams::new()).await
    }

    /// Looks up a block of the given shard by exactly one of sequence
    /// number, logical time or unix time.
    pub async fn lookup_block(
        &self,
        workchain: i32,
        shard: i64,
        request: &LookupBlockRequest,
    ) -> Result<BlockId> {
        let mut query = QueryParams::new();
        query.push("workchain", workchain).push("shard", shard);
        request.append_to(&mut query)?;
        self.call("lookupBlock", query).await
    }

    /// Returns the shard blocks referenced by a masterchain block.
    pub async fn shards(&self, masterchain_seqno: u32) -> Result<Vec<BlockId>> {
        let mut query = QueryParams::new();
        query.push("seqno", masterchain_seqno);
        let shards: Shards = self.call("shards", query).await?;
        Ok(shards.shards)
    }

    /// Returns one page of the transactions contained in a block.
    pub async fn block_transactions(
        &self,
        block: BlockCoordinate,
        request: &BlockTransactionsRequest,
    ) -> Result<BlockTransactions> {
        let mut query = block.to_query()?;
        request.append_to(&mut query)?;
        self.call("blockTransactions", query).await
    }

    /// Returns the metadata of a block.
    pub async fn block_header(
        &self,
        block: BlockCoordinate,
        request: &BlockHeaderRequest,
    ) -> Result<BlockHeader> {
        let mut query = block.to_query()?;
        request.append_to(&mut query)?;
        self.call("getBlockHeader", query).await
    }

    // ── Transactions ─────────────────────────────────────────────

    /// Returns the transaction history of an address, newest first.
    pub async fn transactions(
        &self,
        address: &str,
        request: &TransactionsRequest,
    ) -> Result<Vec<Transaction>> {
        let mut query = address_query(address);
        request.append_to(&mut query)?;
        self.call("getTransactions", query).await
    }

    /// Finds the transaction on `destination` that processed the message
    /// sent by `source` at `created_lt`.
    pub async fn try_locate_tx(
        &self,
        source: &str,
        destination: &str,
        created_lt: u64,
    ) -> Result<Transaction> {
        self.call("tryLocateTx", locate_query(source, destination, created_lt)).await
    }

    /// Finds the transaction on `source` that sent the message received by
    /// `destination` with `created_lt`.
    pub async fn try_locate_source_tx(
        &self,
        source: &str,
        destination: &str,
        created_lt: u64,
    ) -> Result<Transaction> {
        self.call("tryLocateSourceTx", locate_query(source, destination, created_lt)).await
    }
}

impl fmt::Debug for TonCenterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TonCenterClient")
            .field("url", &self.transport.base_url())
            .field("authenticated", &self.transport.has_api_key())
            .finish()
    }
}

fn address_query(address: &str) -> QueryParams {
    let mut query = QueryParams::new();
    query.push("address", address);
    query
}

fn locate_query(source: &str, destination: &str, created_lt: u64) -> QueryParams {
    let mut query = QueryParams::new();
    query
        .push("source", source)
        .push("destination", destination)
        .push("created_lt", created_lt);
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = TonCenterClient::mainnet();
        assert_eq!(client.url(), "https://toncenter.com/api/v2/");

        let client = TonCenterClient::testnet();
        assert_eq!(client.url(), "https://testnet.toncenter.com/api/v2/");

        let client = TonCenterClient::new("https://custom.example.org/api/v2");
        assert_eq!(client.url(), "https://custom.example.org/api/v2/");
    }

    #[test]
    fn debug_does_not_leak_api_key() {
        let client = TonCenterClient::mainnet().with_api_key("very-secret");
        let debug = format!("{client:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("authenticated: true"));
    }

    #[test]
    fn locate_query_keeps_argument_order() {
        let query = locate_query("EQsrc", "EQdst", 0);
        let pairs: Vec<_> = query.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("source", "EQsrc"),
                ("destination", "EQdst"),
                ("created_lt", "0")
            ]
        );
    }

    #[test]
    fn client_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<TonCenterClient>();
    }
}
