//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,
    /// Base URL the store fetches data from; falls back to `url` when empty
    pub data_url: String,

    // Data resources (paths relative to the data base URL)
    pub posts_index: String,
    pub newsletters_index: String,
    /// Schedule data file, relative to the source directory
    pub schedule_file: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,

    // Feed
    pub per_page: usize,
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Hi-Yah! Martial Arts".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),
            data_url: String::new(),

            posts_index: "news/posts-index.json".to_string(),
            newsletters_index: "data/newsletters.json".to_string(),
            schedule_file: "data/schedule.yml".to_string(),

            source_dir: "site".to_string(),
            public_dir: "public".to_string(),

            per_page: 8,
            date_format: "%B %-d, %Y".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Base URL used to fetch the post index and newsletter data
    pub fn data_base(&self) -> &str {
        if self.data_url.is_empty() {
            &self.url
        } else {
            &self.data_url
        }
    }
}
