use serde::{Deserialize, Serialize};

use crate::models::ExtractConfig;
use crate::web_crawler::types::CrawlConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Raw candidates collected across sources before enrichment stops.
    pub max_results: usize,
    /// YAML seed files, one static discovery source each.
    #[serde(default)]
    pub seed_files: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig {
                max_results: 50,
                seed_files: vec!["sources.yml".to_string()],
            },
            crawl: CrawlConfig::default(),
            extract: ExtractConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            output: OutputConfig {
                directory: "out".to_string(),
                pretty_json: true,
            },
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}
