//! Example: Query TON mainnet through toncenter.
//!
//! Run with: cargo run --example mainnet
//!
//! Set `TONCENTER_API_KEY` to lift the anonymous rate limit and
//! `RUST_LOG=toncenter_client=debug` to see each request.

use toncenter_client::{
    BlockCoordinate, BlockTransactionsRequest, Result, TonCenterClient, TransactionsRequest,
};
use tracing_subscriber::EnvFilter;

const ADDRESS: &str = "EQCD39VS5jcptHL8vMjEXrzGaRcCVYto7HUn4bpAOg8xqB2N";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = TonCenterClient::from_env();

    println!("=== toncenter client ===\n");

    // 1. Masterchain state
    println!("1. Fetching masterchain info...");
    let info = client.masterchain_info().await?;
    println!("   Last block seqno: {}", info.last.seqno);
    println!("   State root hash: {}", info.state_root_hash);
    println!();

    // 2. Shards of the last masterchain block
    println!("2. Fetching shards...");
    let shards = client.shards(info.last.seqno).await?;
    for shard in &shards {
        println!("   workchain {} shard {} seqno {}", shard.workchain, shard.shard, shard.seqno);
    }
    println!();

    // 3. Transactions of the last masterchain block
    println!("3. Fetching block transactions...");
    let block = client
        .block_transactions(
            BlockCoordinate::masterchain(info.last.seqno),
            &BlockTransactionsRequest::new().count(5),
        )
        .await?;
    println!("   Listed: {} (incomplete: {})", block.transactions.len(), block.incomplete);
    println!();

    // 4. Account
    println!("4. Fetching account {ADDRESS}...");
    let balance = client.balance(ADDRESS).await?;
    println!("   Balance: {} TON", balance.to_tons());
    let wallet = client.wallet_information(ADDRESS).await?;
    println!("   Wallet: {} ({:?})", wallet.wallet, wallet.wallet_type);
    println!();

    // 5. Recent transactions
    println!("5. Fetching recent transactions...");
    let page = client
        .transactions(ADDRESS, &TransactionsRequest::new().limit(3))
        .await?;
    for tx in &page {
        println!(
            "   lt {} fee {} at {:?}",
            tx.transaction_id.lt,
            tx.fee,
            tx.timestamp()
        );
    }

    println!("\n=== Done! ===");
    Ok(())
}
