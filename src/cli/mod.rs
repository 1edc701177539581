use anyhow::Context;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::{self, FailurePolicy};
use crate::crawl::{
    CrawlSession, exporter::export_library, fetch::HttpFetcher, my_tags::load_my_tags,
};
use crate::storage::json::LibraryWriter;

#[derive(Parser, Debug)]
#[command(name = "atoy-exporter")]
#[command(version = "0.1")]
#[command(about = "simple web scraping utility to export library data from albumoftheyear.org")]
pub struct Cli {
    /// User from which you want to export data
    #[arg(short, long)]
    pub user: String,

    /// Data to export (currently only 'library' accepted)
    #[arg(short, long, default_value = "library")]
    pub data: String,

    /// Show general debug messages
    #[arg(short, long)]
    pub verbose: bool,

    /// Add 'my tags' (user custom tags) to exported albums
    #[arg(
        short = 't',
        long,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub with_my_tags: bool,

    /// Path to an optional config TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory to write the export to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Stop at the first page that cannot be fetched
    #[arg(long)]
    pub fail_fast: bool,
}

/// Kinds of data that can be exported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Library,
}

impl DataKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "library" => Some(DataKind::Library),
            _ => None,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stdout)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<config::Config> {
    let mut cfg = match &cli.config {
        Some(path) => config::Config::load(path)?,
        None => config::Config::default(),
    };
    if let Some(dir) = &cli.output_dir {
        cfg.output.dir = dir.clone();
    }
    if cli.fail_fast {
        cfg.crawl.on_error = FailurePolicy::Abort;
    }
    Ok(cfg)
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = load_config(&cli)?;

    match DataKind::parse(&cli.data) {
        Some(DataKind::Library) => export(&cli, &cfg),
        None => {
            log::warn!(
                "Unsupported data '{}', nothing to export (currently only 'library' accepted)",
                cli.data
            );
            Ok(())
        }
    }
}

fn export(cli: &Cli, cfg: &config::Config) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(&cfg.site);
    let mut session = CrawlSession::new(fetcher, &cfg.site.base_url, cfg.crawl.on_error)
        .with_context(|| "Failed to set up crawl")?;

    println!("Exporting...");

    let my_tags = if cli.with_my_tags {
        let index =
            load_my_tags(&mut session, &cli.user).with_context(|| "Failed to load my tags")?;
        if index.is_empty() {
            log::info!("No albums carry my tags of {}", cli.user);
        }
        Some(index)
    } else {
        None
    };

    let outcome = export_library(&mut session, &cli.user, my_tags.as_ref())
        .with_context(|| format!("Failed to export library of {}", cli.user))?;
    if outcome.library.is_empty() {
        log::warn!("No albums found in the library of {}", cli.user);
    }

    let path = LibraryWriter::new(&cfg.output)
        .write(&outcome.library, &cli.user, chrono::Local::now())
        .with_context(|| "Failed to write library file")?;

    println!(
        "Exported {} albums to {}",
        outcome.library.len(),
        path.to_string_lossy()
    );

    let report = session.into_report();
    if !report.is_clean() {
        println!("Some pages could not be exported ({}):", report.summary());
        for failure in &report.failures {
            println!("    - {}: {}", failure.url, failure.error);
        }
    }

    println!("Done!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("atoy-exporter").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cli = parse(&["--user", "alice"]).unwrap();
        assert_eq!(cli.user, "alice");
        assert_eq!(cli.data, "library");
        assert!(!cli.verbose);
        assert!(cli.with_my_tags);
        assert!(cli.config.is_none());
        assert!(!cli.fail_fast);
    }

    #[test]
    fn user_is_required() {
        assert!(parse(&["--data", "library"]).is_err());
    }

    #[test]
    fn short_flags() {
        let cli = parse(&["-u", "bob", "-d", "library", "-v", "-t", "-o", "/tmp/out"]).unwrap();
        assert_eq!(cli.user, "bob");
        assert!(cli.verbose);
        assert!(cli.with_my_tags);
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn my_tags_can_be_disabled() {
        let cli = parse(&["-u", "bob", "--with-my-tags=false"]).unwrap();
        assert!(!cli.with_my_tags);
    }

    #[test]
    fn only_library_data_is_recognised() {
        assert_eq!(DataKind::parse("library"), Some(DataKind::Library));
        assert_eq!(DataKind::parse("ratings"), None);
        assert_eq!(DataKind::parse("Library"), None);
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&["-u", "bob", "-o", "exports", "--fail-fast"]).unwrap();
        let cfg = load_config(&cli).unwrap();
        assert_eq!(cfg.output.dir, PathBuf::from("exports"));
        assert_eq!(cfg.crawl.on_error, FailurePolicy::Abort);
    }
}
