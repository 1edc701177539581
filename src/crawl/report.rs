use crate::{crawl::error::CrawlError, domain::album::AlbumId};

/// a page that could not be crawled
#[derive(Debug)]
pub struct CrawlFailure {
    pub url: String,
    pub error: CrawlError,
}

/// What went wrong (or half wrong) during one run
#[derive(Debug, Default)]
pub struct CrawlReport {
    pub failures: Vec<CrawlFailure>,
    /// albums whose page was fetched but some fields could not be extracted
    pub incomplete: Vec<AlbumId>,
    /// album links skipped because their page was already visited in this run
    pub skipped_revisits: usize,
}

impl CrawlReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} failed page(s), {} album(s) with missing fields, {} repeated album link(s) skipped",
            self.failures.len(),
            self.incomplete.len(),
            self.skipped_revisits
        )
    }
}
