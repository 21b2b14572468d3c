use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use lead_pipeline::config::{load_config, Config};
use lead_pipeline::models::Result;
use lead_pipeline::pipeline::{Pipeline, ProgressCallback};
use lead_pipeline::sources::{DiscoverySource, StaticSource};
use lead_pipeline::store::{LeadStore, MemoryStore};
use lead_pipeline::web_crawler::CrawlConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = match load_config("config.yml").await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.yml: {e}. Using defaults.");
            Config::default()
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("lead_pipeline={}", config.logging.level).parse()?),
        )
        .init();

    tokio::fs::create_dir_all(&config.output.directory).await?;

    tokio::select! {
        result = run(config) => {
            result?;
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}

async fn run(config: Config) -> Result<()> {
    println!("\n🕷️  Lead Pipeline");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let niche: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Niche (e.g. dentist)")
        .interact_text()?;
    let location: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Location (empty for anywhere)")
        .allow_empty(true)
        .interact_text()?;

    let crawl_config = select_crawl_preset(&config)?;

    let mut sources: Vec<Box<dyn DiscoverySource>> = Vec::new();
    for path in &config.pipeline.seed_files {
        match StaticSource::from_yaml(path).await {
            Ok(source) => sources.push(Box::new(source)),
            Err(e) => warn!(path = %path, error = %e, "seed file skipped"),
        }
    }
    if sources.is_empty() {
        return Err("no usable discovery sources".into());
    }

    let progress: ProgressCallback = Arc::new(|processed, total| {
        println!("[{processed}/{total}] 🕷️  enriched");
    });

    let pipeline = Pipeline::new(crawl_config);
    let records = pipeline
        .run(
            &sources,
            &niche,
            &location,
            config.pipeline.max_results,
            config.extract,
            Some(progress),
        )
        .await?;

    println!("\n🎯 {} businesses after deduplication", records.len());
    for record in records.iter().take(10) {
        println!(
            "  • {} — {} emails, {} phones, score {:.0}",
            record.name.as_deref().unwrap_or("(unnamed)"),
            record.emails.len(),
            record.phones.len(),
            record.quality_score
        );
    }

    let store = MemoryStore::new();
    let job_id = Uuid::new_v4();
    let ids = store.upsert(&records, job_id, "default").await?;
    info!(job = %job_id, stored = ids.len(), "batch persisted");

    export_batch(&config, &records).await?;
    Ok(())
}

fn select_crawl_preset(config: &Config) -> Result<CrawlConfig> {
    let presets = vec![
        "🏃 Quick (3 pages, 2 concurrent)",
        "🔍 Standard (10 pages, 4 concurrent)",
        "🕵️ Deep (25 pages, 6 concurrent)",
        "⚙️ From config.yml",
    ];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Crawl preset")
        .items(&presets)
        .default(1)
        .interact()?;

    Ok(match selection {
        0 => CrawlConfig {
            max_pages: 3,
            concurrency: 2,
            ..CrawlConfig::default()
        },
        1 => CrawlConfig::default(),
        2 => CrawlConfig {
            max_pages: 25,
            concurrency: 6,
            ..CrawlConfig::default()
        },
        _ => config.crawl.clone(),
    })
}

async fn export_batch(
    config: &Config,
    records: &[lead_pipeline::models::BusinessRecord],
) -> Result<()> {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("{}/leads_{}.json", config.output.directory, timestamp);
    let json = if config.output.pretty_json {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    tokio::fs::write(&filename, json).await?;
    println!("📤 Exported batch to {filename}");
    Ok(())
}
