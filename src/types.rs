//! Response types returned by the toncenter endpoints.
//!
//! Only the fields a client commonly needs are modeled. Unknown fields are
//! ignored and most fields fall back to their default when absent, since
//! toncenter omits them depending on account state and node version.
//! Identifying fields (transaction ids, block coordinates) are required: a
//! result without them fails to decode instead of yielding an empty value.

use crate::amount::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies a transaction by its logical time and hash.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    #[serde(with = "int_or_string")]
    pub lt: u64,
    pub hash: String,
}

/// Workchain, shard and sequence number of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockCoordinate {
    pub workchain: i32,
    pub shard: i64,
    pub seqno: u32,
}

impl BlockCoordinate {
    /// Workchain id of the masterchain.
    pub const MASTERCHAIN: i32 = -1;
    /// Shard id covering the whole masterchain.
    pub const MASTERCHAIN_SHARD: i64 = i64::MIN;

    pub const fn new(workchain: i32, shard: i64, seqno: u32) -> Self {
        Self {
            workchain,
            shard,
            seqno,
        }
    }

    /// Coordinate of the masterchain block with the given sequence number.
    pub const fn masterchain(seqno: u32) -> Self {
        Self::new(Self::MASTERCHAIN, Self::MASTERCHAIN_SHARD, seqno)
    }
}

/// Full block identifier (`ton.blockIdExt`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId {
    pub workchain: i32,
    #[serde(with = "int_or_string")]
    pub shard: i64,
    pub seqno: u32,
    #[serde(default)]
    pub root_hash: String,
    #[serde(default)]
    pub file_hash: String,
}

impl BlockId {
    pub const fn coordinate(&self) -> BlockCoordinate {
        BlockCoordinate::new(self.workchain, self.shard, self.seqno)
    }
}

/// An account address as reported by toncenter.
///
/// Older nodes send a plain string, newer ones an `accountAddress` object;
/// both decode to the inner address string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "AccountAddressRepr")]
pub struct AccountAddress(pub String);

impl AccountAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// External messages have no source (or destination) address.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AccountAddressRepr {
    Plain(String),
    Tagged { account_address: String },
}

impl From<AccountAddressRepr> for AccountAddress {
    fn from(repr: AccountAddressRepr) -> Self {
        match repr {
            AccountAddressRepr::Plain(address) => Self(address),
            AccountAddressRepr::Tagged { account_address } => Self(account_address),
        }
    }
}

/// Lifecycle state of an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressState {
    Active,
    Uninitialized,
    Frozen,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Basic account information (`getAddressInformation`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressInformation {
    pub balance: Amount,
    pub code: String,
    pub data: String,
    pub last_transaction_id: TransactionId,
    pub block_id: BlockId,
    pub frozen_hash: String,
    pub sync_utime: i64,
    pub state: AddressState,
}

impl AddressInformation {
    /// Time the serving node was synced to when answering.
    pub fn synced_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sync_utime, 0)
    }
}

/// Account information with contract-specific state
/// (`getExtendedAddressInformation`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedAddressInformation {
    pub address: AccountAddress,
    pub balance: Amount,
    pub last_transaction_id: TransactionId,
    pub block_id: BlockId,
    pub sync_utime: i64,
    pub account_state: AccountState,
    pub revision: i64,
}

/// Parsed contract state. Which fields are filled depends on `kind`, for
/// example `wallet.v3.accountState` carries `wallet_id` and `seqno` while
/// `raw.accountState` carries `code` and `data`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountState {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(with = "int_or_string")]
    pub wallet_id: u64,
    pub seqno: u32,
    pub code: String,
    pub data: String,
    pub frozen_hash: String,
}

/// Wallet contract information (`getWalletInformation`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletInformation {
    pub wallet: bool,
    pub balance: Amount,
    pub account_state: AddressState,
    pub wallet_type: Option<String>,
    pub seqno: Option<u32>,
    pub last_transaction_id: TransactionId,
    pub wallet_id: Option<u64>,
}

/// Current masterchain state (`getMasterChainInfo`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterchainInfo {
    pub last: BlockId,
    #[serde(default)]
    pub state_root_hash: String,
    #[serde(default)]
    pub init: BlockId,
}

/// Latest block agreed on by the serving nodes (`getConsensusBlock`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusBlock {
    #[serde(rename = "consensus_block", alias = "consensus_block_id")]
    pub seqno: u32,
    /// Unix time of the last update, with sub-second precision.
    pub timestamp: f64,
}

impl ConsensusBlock {
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        // Millisecond precision is all the endpoint reports.
        DateTime::from_timestamp_millis((self.timestamp * 1000.0).round() as i64)
    }
}

/// Block metadata (`getBlockHeader`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockHeader {
    pub id: BlockId,
    pub global_id: i32,
    pub version: u32,
    pub after_merge: bool,
    pub after_split: bool,
    pub before_split: bool,
    pub want_merge: bool,
    pub want_split: bool,
    pub is_key_block: bool,
    pub catchain_seqno: u32,
    pub min_ref_mc_seqno: u32,
    pub prev_key_block_seqno: u32,
    #[serde(with = "int_or_string")]
    pub start_lt: u64,
    #[serde(with = "int_or_string")]
    pub end_lt: u64,
    pub gen_utime: i64,
    pub prev_blocks: Vec<BlockId>,
}

impl BlockHeader {
    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.gen_utime, 0)
    }
}

/// One page of transactions in a block (`blockTransactions`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTransactions {
    pub id: BlockId,
    #[serde(default)]
    pub req_count: u32,
    /// `true` when more transactions follow this page.
    #[serde(default)]
    pub incomplete: bool,
    #[serde(default)]
    pub transactions: Vec<ShortTransactionId>,
}

/// Transaction reference inside a block listing (`blocks.shortTxId`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortTransactionId {
    pub mode: u32,
    pub account: String,
    #[serde(with = "int_or_string")]
    pub lt: u64,
    pub hash: String,
}

/// A transaction with its inbound and outbound messages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub address: AccountAddress,
    #[serde(default)]
    pub utime: i64,
    #[serde(default)]
    pub data: String,
    pub transaction_id: TransactionId,
    #[serde(default)]
    pub fee: Amount,
    #[serde(default)]
    pub storage_fee: Amount,
    #[serde(default)]
    pub other_fee: Amount,
    #[serde(default)]
    pub in_msg: Option<Message>,
    #[serde(default)]
    pub out_msgs: Vec<Message>,
}

impl Transaction {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.utime, 0)
    }
}

/// An internal or external message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub source: AccountAddress,
    pub destination: AccountAddress,
    pub value: Amount,
    pub fwd_fee: Amount,
    pub ihr_fee: Amount,
    #[serde(with = "int_or_string")]
    pub created_lt: u64,
    pub body_hash: String,
    pub msg_data: MessageData,
    /// Decoded text comment, if the body carries one.
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageData {
    #[serde(rename = "@type")]
    pub kind: String,
    pub body: String,
    pub init_state: String,
    pub text: Option<String>,
}

/// Integers that toncenter encodes either as JSON numbers or as decimal
/// strings (64-bit values do not survive JavaScript number parsing).
/// Serialized back as strings.
pub(crate) mod int_or_string {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt::{self, Display};
    use std::marker::PhantomData;
    use std::str::FromStr;

    pub(crate) fn serialize<T: Display, S: Serializer>(
        value: &T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub(crate) fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr + TryFrom<u64> + TryFrom<i64>,
        <T as FromStr>::Err: Display,
        <T as TryFrom<u64>>::Error: Display,
        <T as TryFrom<i64>>::Error: Display,
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IntVisitor(PhantomData))
    }

    struct IntVisitor<T>(PhantomData<T>);

    impl<T> Visitor<'_> for IntVisitor<T>
    where
        T: FromStr + TryFrom<u64> + TryFrom<i64>,
        <T as FromStr>::Err: Display,
        <T as TryFrom<u64>>::Error: Display,
        <T as TryFrom<i64>>::Error: Display,
    {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer or a decimal string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
            v.trim().parse().map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
            T::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
            T::try_from(v).map_err(E::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transaction_id_accepts_string_and_number_lt() {
        let id: TransactionId =
            serde_json::from_value(json!({"lt": "18446744073709551615", "hash": "abc="})).unwrap();
        assert_eq!(id.lt, u64::MAX);

        let id: TransactionId = serde_json::from_value(json!({"lt": 42, "hash": "abc="})).unwrap();
        assert_eq!(id.lt, 42);

        assert_eq!(serde_json::to_value(&id).unwrap()["lt"], "42");
    }

    #[test]
    fn block_id_decodes_signed_shard() {
        let block: BlockId = serde_json::from_value(json!({
            "@type": "ton.blockIdExt",
            "workchain": -1,
            "shard": "-9223372036854775808",
            "seqno": 34_000_000,
            "root_hash": "r",
            "file_hash": "f"
        }))
        .unwrap();
        assert_eq!(block.coordinate(), BlockCoordinate::masterchain(34_000_000));
        assert_eq!(block.root_hash, "r");
    }

    #[test]
    fn identifying_fields_are_required() {
        assert!(serde_json::from_value::<TransactionId>(json!({"lt": "1"})).is_err());
        assert!(serde_json::from_value::<BlockId>(json!({"workchain": 0, "seqno": 1})).is_err());
        assert!(serde_json::from_value::<MasterchainInfo>(json!({"unexpected": 1})).is_err());
        assert!(serde_json::from_value::<Transaction>(json!({"utime": 1})).is_err());
        assert!(serde_json::from_value::<BlockTransactions>(json!({"incomplete": false})).is_err());
    }

    #[test]
    fn block_id_hashes_are_optional() {
        let block: BlockId =
            serde_json::from_value(json!({"workchain": 0, "shard": "0", "seqno": 3})).unwrap();
        assert_eq!(block.seqno, 3);
        assert!(block.root_hash.is_empty());
    }

    #[test]
    fn account_address_accepts_both_shapes() {
        let plain: AccountAddress = serde_json::from_value(json!("EQabc")).unwrap();
        let tagged: AccountAddress = serde_json::from_value(
            json!({"@type": "accountAddress", "account_address": "EQabc"}),
        )
        .unwrap();
        assert_eq!(plain, tagged);
        assert_eq!(plain.as_str(), "EQabc");
    }

    #[test]
    fn unknown_address_state_is_tolerated() {
        let state: AddressState = serde_json::from_value(json!("active")).unwrap();
        assert_eq!(state, AddressState::Active);
        let state: AddressState = serde_json::from_value(json!("nonexist")).unwrap();
        assert_eq!(state, AddressState::Unknown);
    }

    #[test]
    fn transaction_decodes_exact_fees() {
        let tx: Transaction = serde_json::from_value(json!({
            "@type": "raw.transaction",
            "utime": 1_700_000_000,
            "data": "te6cc",
            "transaction_id": {"@type": "internal.transactionId", "lt": "41000000000001", "hash": "h1"},
            "fee": "1234567",
            "storage_fee": "17",
            "other_fee": "1234550",
            "in_msg": {
                "source": "",
                "destination": "EQdest",
                "value": "0",
                "fwd_fee": "0",
                "ihr_fee": "0",
                "created_lt": "0",
                "body_hash": "bh",
                "msg_data": {"@type": "msg.dataRaw", "body": "b", "init_state": ""},
                "message": ""
            },
            "out_msgs": [{
                "source": "EQdest",
                "destination": "EQother",
                "value": "1000000000000000001",
                "fwd_fee": "666672",
                "ihr_fee": "0",
                "created_lt": "41000000000002",
                "body_hash": "bh2",
                "msg_data": {"@type": "msg.dataText", "text": "aGk="},
                "message": "hi"
            }]
        }))
        .unwrap();

        assert_eq!(tx.transaction_id.lt, 41_000_000_000_001);
        assert_eq!(tx.fee, Amount::from_nanotons(1_234_567));
        assert!(tx.in_msg.as_ref().unwrap().source.is_empty());
        let out = &tx.out_msgs[0];
        assert_eq!(out.value.to_string(), "1000000000000000001");
        assert_eq!(out.created_lt, 41_000_000_000_002);
        assert_eq!(out.msg_data.text.as_deref(), Some("aGk="));
        assert_eq!(
            tx.timestamp().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }

    #[test]
    fn consensus_block_accepts_either_field_name() {
        let block: ConsensusBlock =
            serde_json::from_value(json!({"consensus_block": 100, "timestamp": 1.5})).unwrap();
        assert_eq!(block.seqno, 100);

        let block: ConsensusBlock =
            serde_json::from_value(json!({"consensus_block_id": 7, "timestamp": 1.5})).unwrap();
        assert_eq!(block.seqno, 7);
        assert_eq!(block.updated_at().unwrap().timestamp_millis(), 1500);
    }

    #[test]
    fn wallet_information_for_non_wallet() {
        let info: WalletInformation = serde_json::from_value(json!({
            "wallet": false,
            "balance": "0",
            "account_state": "uninitialized",
            "last_transaction_id": {"lt": "0", "hash": ""}
        }))
        .unwrap();
        assert!(!info.wallet);
        assert_eq!(info.account_state, AddressState::Uninitialized);
        assert_eq!(info.wallet_type, None);
    }
}
