use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            site: SiteConfig::default(),
            output: OutputConfig::default(),
            crawl: CrawlConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.albumoftheyear.org".to_string(),
            user_agent: concat!("atoy-exporter/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// first part of the exported file name
    pub prefix: String,
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: "atoy".to_string(),
            dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CrawlConfig {
    pub on_error: FailurePolicy,
}

/// What to do when a page cannot be fetched
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// record the failure and keep crawling
    #[default]
    Skip,
    /// stop at the first failure
    Abort,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_config_toml() -> anyhow::Result<()> {
        let toml_str = r#"
version = 1

[site]
base_url = "http://localhost:8080"
user_agent = "test-agent"
connect_timeout_secs = 1
read_timeout_secs = 2

[output]
prefix = "backup"
dir = "/tmp/exports"

[crawl]
on_error = "abort"
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert_eq!(cfg.version, 1);

        assert_eq!(cfg.site.base_url, "http://localhost:8080");
        assert_eq!(cfg.site.user_agent, "test-agent");
        assert_eq!(cfg.site.connect_timeout_secs, 1);
        assert_eq!(cfg.site.read_timeout_secs, 2);

        assert_eq!(cfg.output.prefix, "backup");
        assert_eq!(cfg.output.dir, PathBuf::from("/tmp/exports"));

        assert_eq!(cfg.crawl.on_error, FailurePolicy::Abort);

        Ok(())
    }

    #[test]
    fn test_missing_sections_use_defaults() -> anyhow::Result<()> {
        let toml_str = r#"
version = 1

[output]
dir = "exports"
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert_eq!(cfg.site.base_url, "https://www.albumoftheyear.org");
        // partially filled section keeps defaults for the rest
        assert_eq!(cfg.output.prefix, "atoy");
        assert_eq!(cfg.output.dir, PathBuf::from("exports"));
        assert_eq!(cfg.crawl.on_error, FailurePolicy::Skip);

        Ok(())
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
