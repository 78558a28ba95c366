//! Request option sets and their serialization to URL query parameters.
//!
//! Option sets are plain values with public fields: build one, pass it to a
//! client method, adjust it and pass it again. Validation runs every time
//! the options are turned into a query, never at construction.
//!
//! toncenter treats a zero count, logical time or sequence number as "not
//! given", so zero-valued numeric options and empty strings are left out of
//! the query entirely. Flags are only sent when set.

use crate::error::InvalidParameters;
use crate::types::{BlockCoordinate, ShortTransactionId, TransactionId};
use chrono::{DateTime, Utc};
use std::fmt::Display;

/// Ordered list of query parameters for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter unconditionally.
    pub fn push(&mut self, key: &'static str, value: impl Display) -> &mut Self {
        self.0.push((key, value.to_string()));
        self
    }

    /// Appends a numeric parameter unless it is zero.
    pub fn push_nonzero<T>(&mut self, key: &'static str, value: T) -> &mut Self
    where
        T: Display + Default + PartialEq,
    {
        if value != T::default() {
            self.push(key, value);
        }
        self
    }

    /// Appends a string parameter unless it is empty.
    pub fn push_nonempty(&mut self, key: &'static str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.push(key, value);
        }
        self
    }

    /// Appends `key=true` if the flag is set.
    pub fn push_flag(&mut self, key: &'static str, set: bool) -> &mut Self {
        if set {
            self.push(key, "true");
        }
        self
    }

    /// Value of the first parameter named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A set of request options that knows how to check and serialize itself.
pub trait QueryParameters {
    /// Checks option combinations the server would reject or misinterpret.
    fn validate(&self) -> Result<(), InvalidParameters> {
        Ok(())
    }

    /// Writes the options into `query`. Called only after [`validate`](Self::validate) passed.
    fn write_query(&self, query: &mut QueryParams);

    /// Validates the options and appends them to `query`.
    fn append_to(&self, query: &mut QueryParams) -> Result<(), InvalidParameters> {
        self.validate()?;
        self.write_query(query);
        Ok(())
    }

    /// Validates the options and serializes them into a fresh query.
    fn to_query(&self) -> Result<QueryParams, InvalidParameters> {
        let mut query = QueryParams::new();
        self.append_to(&mut query)?;
        Ok(query)
    }
}

/// A logical time and a transaction hash must be given together.
fn check_cursor_pair(
    lt: u64,
    hash: &str,
    lt_field: &'static str,
    hash_field: &'static str,
) -> Result<(), InvalidParameters> {
    if (lt != 0) != !hash.is_empty() {
        return Err(InvalidParameters::UnpairedCursor {
            lt_field,
            hash_field,
        });
    }
    Ok(())
}

impl QueryParameters for BlockCoordinate {
    // Workchain 0 is the basechain, so none of these are optional.
    fn write_query(&self, query: &mut QueryParams) {
        query
            .push("workchain", self.workchain)
            .push("shard", self.shard)
            .push("seqno", self.seqno);
    }
}

/// Options for an address transaction history request (`getTransactions`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionsRequest {
    /// Maximum number of transactions in the response.
    pub limit: u32,
    /// Logical time of the transaction to start with. Must be sent with `hash`.
    pub lt: u64,
    /// Hash of the transaction to start with, base64 or hex. Must be sent with `lt`.
    pub hash: String,
    /// Logical time of the transaction to finish with.
    pub to_lt: u64,
    /// Only use liteservers that keep the full history.
    pub archival: bool,
}

impl TransactionsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Start the listing at the transaction with this logical time and hash.
    pub fn starting_at(mut self, lt: u64, hash: impl Into<String>) -> Self {
        self.lt = lt;
        self.hash = hash.into();
        self
    }

    /// Continue a listing from a transaction of the previous page.
    ///
    /// The server includes that transaction itself as the first entry of the
    /// next page.
    pub fn continue_after(self, last: &TransactionId) -> Self {
        self.starting_at(last.lt, last.hash.clone())
    }

    pub fn to_lt(mut self, to_lt: u64) -> Self {
        self.to_lt = to_lt;
        self
    }

    pub fn archival(mut self, archival: bool) -> Self {
        self.archival = archival;
        self
    }
}

impl QueryParameters for TransactionsRequest {
    fn validate(&self) -> Result<(), InvalidParameters> {
        check_cursor_pair(self.lt, &self.hash, "lt", "hash")?;
        if self.lt != 0 && self.to_lt != 0 && self.lt > self.to_lt {
            return Err(InvalidParameters::InvertedRange {
                lt: self.lt,
                to_lt: self.to_lt,
            });
        }
        Ok(())
    }

    fn write_query(&self, query: &mut QueryParams) {
        query.push_nonzero("limit", self.limit);
        if self.lt != 0 {
            query.push("lt", self.lt).push("hash", &self.hash);
        }
        query
            .push_nonzero("to_lt", self.to_lt)
            .push_flag("archival", self.archival);
    }
}

/// Options for listing the transactions of a block (`blockTransactions`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockTransactionsRequest {
    pub root_hash: String,
    pub file_hash: String,
    /// Logical time of the last transaction already seen. Must be sent with `after_hash`.
    pub after_lt: u64,
    /// Hash of the last transaction already seen. Must be sent with `after_lt`.
    pub after_hash: String,
    /// Maximum number of transactions in the response.
    pub count: u32,
}

impl BlockTransactionsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the block by its root and file hash.
    pub fn hashes(mut self, root_hash: impl Into<String>, file_hash: impl Into<String>) -> Self {
        self.root_hash = root_hash.into();
        self.file_hash = file_hash.into();
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Request the page following `last`, the final entry of the previous page.
    pub fn continue_after(mut self, last: &ShortTransactionId) -> Self {
        self.after_lt = last.lt;
        self.after_hash = last.hash.clone();
        self
    }
}

impl QueryParameters for BlockTransactionsRequest {
    fn validate(&self) -> Result<(), InvalidParameters> {
        check_cursor_pair(self.after_lt, &self.after_hash, "after_lt", "after_hash")
    }

    fn write_query(&self, query: &mut QueryParams) {
        query
            .push_nonempty("root_hash", &self.root_hash)
            .push_nonempty("file_hash", &self.file_hash)
            .push_nonzero("after_lt", self.after_lt)
            .push_nonempty("after_hash", &self.after_hash)
            .push_nonzero("count", self.count);
    }
}

/// Options for a block header request (`getBlockHeader`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockHeaderRequest {
    pub root_hash: String,
    pub file_hash: String,
}

impl BlockHeaderRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hashes(root_hash: impl Into<String>, file_hash: impl Into<String>) -> Self {
        Self {
            root_hash: root_hash.into(),
            file_hash: file_hash.into(),
        }
    }
}

impl QueryParameters for BlockHeaderRequest {
    fn write_query(&self, query: &mut QueryParams) {
        query
            .push_nonempty("root_hash", &self.root_hash)
            .push_nonempty("file_hash", &self.file_hash);
    }
}

/// Selects a block for `lookupBlock` by exactly one of sequence number,
/// logical time or unix time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupBlockRequest {
    pub seqno: u32,
    pub lt: u64,
    pub unixtime: u64,
}

impl LookupBlockRequest {
    pub fn by_seqno(seqno: u32) -> Self {
        Self {
            seqno,
            ..Self::default()
        }
    }

    pub fn by_lt(lt: u64) -> Self {
        Self {
            lt,
            ..Self::default()
        }
    }

    pub fn by_unixtime(unixtime: u64) -> Self {
        Self {
            unixtime,
            ..Self::default()
        }
    }

    /// Block generated at (or right before) the given instant.
    ///
    /// Instants before the epoch select nothing and fail validation.
    pub fn at(time: DateTime<Utc>) -> Self {
        Self::by_unixtime(u64::try_from(time.timestamp()).unwrap_or_default())
    }

    fn selectors(&self) -> Vec<&'static str> {
        [
            ("seqno", self.seqno != 0),
            ("lt", self.lt != 0),
            ("unixtime", self.unixtime != 0),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

impl QueryParameters for LookupBlockRequest {
    fn validate(&self) -> Result<(), InvalidParameters> {
        match self.selectors().as_slice() {
            [] => Err(InvalidParameters::MissingBlockSelector),
            [_] => Ok(()),
            many => Err(InvalidParameters::ConflictingBlockSelectors(many.to_vec())),
        }
    }

    fn write_query(&self, query: &mut QueryParams) {
        query
            .push_nonzero("seqno", self.seqno)
            .push_nonzero("lt", self.lt)
            .push_nonzero("unixtime", self.unixtime);
    }
}
