//! hiyah: site engine for a martial-arts school's news pages
//!
//! Loads JSON-backed news posts and newsletter records over HTTP, filters
//! and orders them, and renders the news feed, newsletter archive and class
//! schedule using embedded Tera templates.

pub mod archive;
pub mod commands;
pub mod config;
pub mod content;
pub mod feed;
pub mod helpers;
pub mod schedule;
pub mod server;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The main site application
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Source directory (static site files and local data)
    pub source_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Site {
    /// Create a new Site instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
            public_dir,
        })
    }

    /// Fetch site data and render the static pages
    pub async fn build(&self) -> Result<()> {
        commands::build::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
