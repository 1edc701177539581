use crate::cli::run;

pub mod cli;
pub mod config;
pub mod crawl;
pub mod domain;
pub mod storage;

fn main() -> anyhow::Result<()> {
    run()
}
