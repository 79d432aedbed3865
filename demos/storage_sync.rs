//! Storage zone walkthrough
//!
//! This example demonstrates:
//! - Uploading a local file and an in-memory buffer
//! - Listing a directory
//! - Downloading an object
//! - Deleting objects
//!
//! Reads `BUNNYCDN_STORAGE_KEY`, `BUNNYCDN_STORAGE_ZONE` and optionally
//! `BUNNYCDN_STORAGE_REGION` from the environment or a `.env` file.
//!
//! Run with: cargo run --example storage_sync

use bunnycdn_client::{StorageClient, StorageConfig, StorageEntry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "bunnycdn_client=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("🐰 BunnyCDN - Storage Sync Example\n");

    let client = StorageClient::new(StorageConfig::from_env()?)?;
    println!("   zone: {}", client.base_url());

    let workdir = std::env::temp_dir().join("bunnycdn-storage-demo");
    tokio::fs::create_dir_all(&workdir).await?;
    tokio::fs::write(workdir.join("hello.txt"), b"Hello from the edge!").await?;

    // ==================== Upload ====================

    println!("\n📤 Uploading 'hello.txt' to /demo/hello.txt...");
    match client.put_file("hello.txt", Some("/demo/hello.txt"), &workdir).await? {
        Ok(envelope) => println!("   ✅ {}", serde_json::to_string(&envelope)?),
        Err(failure) => println!("   ⚠️  {}", serde_json::to_string(&failure)?),
    }

    let manifest = serde_json::json!({
        "generated": chrono::Utc::now().to_rfc3339(),
        "files": ["hello.txt"],
    });
    println!("\n📤 Uploading /demo/manifest.json...");
    match client
        .put_bytes("/demo/manifest.json", serde_json::to_vec_pretty(&manifest)?)
        .await?
    {
        Ok(envelope) => println!("   ✅ {}", serde_json::to_string(&envelope)?),
        Err(failure) => println!("   ⚠️  {}", serde_json::to_string(&failure)?),
    }

    // ==================== Listing ====================

    println!("\n📋 Listing /demo/...");
    match client.list_objects(Some("/demo/")).await? {
        Ok(entries) => {
            for entry in &entries {
                match entry {
                    StorageEntry::File(name) => println!("   📄 {}", name),
                    StorageEntry::Folder(name) => println!("   📁 {}/", name),
                }
            }
        }
        Err(failure) => println!("   ⚠️  {}", serde_json::to_string(&failure)?),
    }

    // ==================== Download ====================

    let downloads = workdir.join("downloads");
    tokio::fs::create_dir_all(&downloads).await?;

    println!("\n📥 Downloading /demo/hello.txt...");
    match client.download_file("/demo/hello.txt", &downloads).await? {
        Ok(_) => {
            let content = tokio::fs::read_to_string(downloads.join("hello.txt")).await?;
            println!("   ✅ Content: {}", content);
        }
        Err(failure) => println!("   ⚠️  {}", serde_json::to_string(&failure)?),
    }

    // ==================== Cleanup ====================

    println!("\n🗑️  Deleting /demo/...");
    match client.delete_file("/demo/").await? {
        Ok(envelope) => println!("   ✅ {}", envelope.message),
        Err(failure) => println!("   ⚠️  {}", failure),
    }

    tokio::fs::remove_dir_all(&workdir).await?;

    println!("\n✨ Done!");
    Ok(())
}
