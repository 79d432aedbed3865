//! Account management walkthrough
//!
//! This example demonstrates:
//! - Listing pull zones and storage zones
//! - Purging a URL from the cache
//! - Pulling statistics for the last week
//!
//! Reads `BUNNYCDN_API_KEY` (and optionally `BUNNYCDN_API_ENDPOINT`) from the
//! environment or a `.env` file.
//!
//! Run with: cargo run --example manage_pull_zones -- [url-to-purge]

use bunnycdn_client::{ManagementClient, ManagementConfig, StatsQuery};
use chrono::{Duration, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "bunnycdn_client=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("🐰 BunnyCDN - Pull Zone Management Example\n");

    let client = ManagementClient::new(ManagementConfig::from_env()?)?;

    // ==================== Zones ====================

    println!("📋 Pull zones...");
    match client.get_pull_zone_list().await {
        Ok(zones) => {
            for zone in &zones {
                println!("   - {} (id: {})", zone.name, zone.id);
            }
        }
        Err(failure) => println!("   ⚠️  {}", serde_json::to_string(&failure)?),
    }

    println!("\n📦 Storage zones...");
    match client.storage_zone_data().await {
        Ok(zones) => {
            for zone in &zones {
                println!(
                    "   - {} (id: {}, used: {} bytes, hostnames: {:?})",
                    zone.storage_zone_name, zone.id, zone.storage_used, zone.host_names
                );
            }
        }
        Err(failure) => println!("   ⚠️  {}", serde_json::to_string(&failure)?),
    }

    // ==================== Cache ====================

    if let Some(url) = std::env::args().nth(1) {
        println!("\n🧹 Purging {}...", url);
        match client.purge_url_cache(&url).await {
            Ok(envelope) => println!("   ✅ {}", serde_json::to_string(&envelope)?),
            Err(failure) => println!("   ⚠️  {}", serde_json::to_string(&failure)?),
        }
    }

    // ==================== Statistics ====================

    let today = Utc::now().date_naive();
    let query = StatsQuery::default().between(today - Duration::days(7), today);

    println!("\n📈 Statistics for the last 7 days...");
    match client.stats(&query).await {
        Ok(stats) => {
            let served = stats.get("TotalBandwidthUsed").cloned().unwrap_or_default();
            let requests = stats.get("TotalRequestsServed").cloned().unwrap_or_default();
            println!("   bandwidth: {}  requests: {}", served, requests);
        }
        Err(failure) => println!("   ⚠️  {}", serde_json::to_string(&failure)?),
    }

    println!("\n✨ Done!");
    Ok(())
}
