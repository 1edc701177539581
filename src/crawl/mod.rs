//! Crawling the site: one session per export run

use std::collections::HashSet;

use scraper::Html;
use url::Url;

use crate::{
    config::FailurePolicy,
    crawl::{
        error::CrawlError,
        fetch::PageFetcher,
        parser::PageParser,
        report::{CrawlFailure, CrawlReport},
    },
};

pub mod error;
pub mod exporter;
pub mod extract;
pub mod fetch;
pub mod my_tags;
pub mod parser;
pub mod report;
pub mod visitor;

const ALBUM_PATH_PREFIX: &str = "/album/";

/// State shared by every fetch of one export run.
///
/// Every URL is fetched at most once per session, whichever part of the crawl asks for it.
pub struct CrawlSession<F: PageFetcher> {
    fetcher: F,
    base_url: Url,
    parser: PageParser,
    visited: HashSet<Url>,
    policy: FailurePolicy,
    report: CrawlReport,
}

impl<F: PageFetcher> CrawlSession<F> {
    pub fn new(fetcher: F, base_url: &str, policy: FailurePolicy) -> Result<Self, CrawlError> {
        let base_url = Url::parse(base_url).map_err(|source| CrawlError::InvalidUrl {
            input: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            fetcher,
            base_url,
            parser: PageParser::new()?,
            visited: HashSet::new(),
            policy,
            report: CrawlReport::default(),
        })
    }

    pub fn parser(&self) -> &PageParser {
        &self.parser
    }

    pub fn report(&self) -> &CrawlReport {
        &self.report
    }

    pub(crate) fn report_mut(&mut self) -> &mut CrawlReport {
        &mut self.report
    }

    pub fn into_report(self) -> CrawlReport {
        self.report
    }

    #[cfg(test)]
    pub(crate) fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches and parses a page, or returns `None` if this session already visited it.
    ///
    /// The url counts as visited even if the fetch fails.
    pub fn visit(&mut self, url: &Url) -> Result<Option<Html>, CrawlError> {
        if !self.visited.insert(url.clone()) {
            return Ok(None);
        }
        let body = self.fetcher.fetch(url)?;
        Ok(Some(Html::parse_document(&body)))
    }

    /// resolves a link found on a page against the site
    pub fn resolve(&self, href: &str) -> Result<Url, CrawlError> {
        self.base_url
            .join(href)
            .map_err(|source| CrawlError::InvalidUrl {
                input: href.to_string(),
                source,
            })
    }

    /// Resolves `href` if it leads to an album page. Other links give `None`.
    pub fn album_url(&self, href: &str) -> Option<Url> {
        self.resolve(href)
            .ok()
            .filter(|url| url.path().starts_with(ALBUM_PATH_PREFIX))
    }

    /// `<base>/user/<username>/<section>/`
    pub fn user_url(&self, username: &str, section: &str) -> Result<Url, CrawlError> {
        let mut page = self.base_url.clone();
        page.path_segments_mut()
            .map_err(|_| CrawlError::InvalidUrl {
                input: self.base_url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .clear()
            .extend(["user", username, section, ""]);
        Ok(page)
    }

    /// Applies the failure policy: under `Skip` the failure is logged and recorded,
    /// under `Abort` it is handed back to the caller.
    pub fn fail(&mut self, url: &Url, error: CrawlError) -> Result<(), CrawlError> {
        match self.policy {
            FailurePolicy::Abort => Err(error),
            FailurePolicy::Skip => {
                log::warn!("skipping {url}: {error}");
                self.report.failures.push(CrawlFailure {
                    url: url.to_string(),
                    error,
                });
                Ok(())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::crawl::fetch::FixtureFetcher;

    pub const BASE: &str = "https://www.albumoftheyear.org";

    pub fn session(fetcher: FixtureFetcher) -> CrawlSession<FixtureFetcher> {
        CrawlSession::new(fetcher, BASE, FailurePolicy::Skip).unwrap()
    }

    #[test]
    fn visit_fetches_each_url_once() {
        let url = format!("{BASE}/album/1-x.php");
        let mut session = session(FixtureFetcher::new().with_page(&url, "<p>hi</p>"));
        let url = Url::parse(&url).unwrap();

        assert!(session.visit(&url).unwrap().is_some());
        assert!(session.visit(&url).unwrap().is_none());
        assert_eq!(session.fetcher().requests.len(), 1);
    }

    #[test]
    fn failed_urls_are_not_fetched_again() {
        let mut session = session(FixtureFetcher::new());
        let url = Url::parse(&format!("{BASE}/album/404-missing.php")).unwrap();

        assert!(matches!(
            session.visit(&url),
            Err(CrawlError::Status { status: 404, .. })
        ));
        assert!(session.visit(&url).unwrap().is_none());
        assert_eq!(session.fetcher().requests.len(), 1);
    }

    #[test]
    fn album_url_only_accepts_album_paths() {
        let session = session(FixtureFetcher::new());

        assert_eq!(
            session.album_url("/album/12-a.php").map(String::from),
            Some(format!("{BASE}/album/12-a.php"))
        );
        assert!(session.album_url("https://cdn.example.com/album/12-a.php").is_some());
        assert!(session.album_url("/artist/7-aphex-twin/").is_none());
        assert!(session.album_url("/albums/").is_none());
    }

    #[test]
    fn user_url_escapes_username() {
        let session = session(FixtureFetcher::new());

        let url = session.user_url("alice", "library").unwrap();
        assert_eq!(url.as_str(), format!("{BASE}/user/alice/library/"));

        let url = session.user_url("a b/c", "tags").unwrap();
        assert_eq!(url.as_str(), format!("{BASE}/user/a%20b%2Fc/tags/"));
    }

    #[test]
    fn fail_records_or_aborts_depending_on_policy() {
        let url = Url::parse(BASE).unwrap();
        let error = || CrawlError::Status {
            url: BASE.to_string(),
            status: 500,
        };

        let mut skipping = session(FixtureFetcher::new());
        assert!(skipping.fail(&url, error()).is_ok());
        assert_eq!(skipping.report().failures.len(), 1);

        let mut aborting =
            CrawlSession::new(FixtureFetcher::new(), BASE, FailurePolicy::Abort).unwrap();
        assert!(aborting.fail(&url, error()).is_err());
        assert!(aborting.report().is_clean());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            CrawlSession::new(FixtureFetcher::new(), "not a url", FailurePolicy::Skip),
            Err(CrawlError::InvalidUrl { .. })
        ));
    }
}
