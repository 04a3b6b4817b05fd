//! broker-press: static site builder for an insurance brokerage
//!
//! Builds the marketing pages (home, services, about, contact) and a
//! Markdown blog into plain HTML using Tera templates embedded in the
//! binary. A development server adds live reload and accepts quote
//! requests posted by the contact form.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod quote;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the site configuration file at the site root
pub const CONFIG_FILE: &str = "site.yml";

/// A site on disk: its configuration and resolved directories
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory
    pub content_dir: PathBuf,
    /// Blog posts directory
    pub blog_dir: PathBuf,
    /// Static assets copied verbatim
    pub static_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site directory, using default configuration when `site.yml`
    /// is missing
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let blog_dir = content_dir.join(&config.blog.dir);
        let static_dir = base_dir.join(&config.static_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            blog_dir,
            static_dir,
            public_dir,
        }
    }

    /// Load every published post
    pub fn load_blog(&self) -> content::Result<content::Blog> {
        content::Blog::load(&content::ContentLoader::new(self))
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<generator::BuildReport> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        assert_eq!(site.config.title, "Diné Insurance");
        assert_eq!(site.blog_dir, tmp.path().join("content").join("blog"));
        assert_eq!(site.public_dir, tmp.path().join("public"));
    }

    #[test]
    fn test_config_overrides_directories() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "title: Test Agency\npublic_dir: dist\nblog:\n  dir: posts\n",
        )
        .unwrap();

        let site = Site::new(tmp.path()).unwrap();
        assert_eq!(site.config.title, "Test Agency");
        assert_eq!(site.public_dir, tmp.path().join("dist"));
        assert_eq!(site.blog_dir, tmp.path().join("content").join("posts"));
        // Unset sections keep their defaults
        assert_eq!(site.config.blog.per_page, 6);
    }
}
