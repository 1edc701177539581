use std::time::Duration;

use url::Url;

use crate::{config::SiteConfig, crawl::error::CrawlError};

/// Something that can download a page body
pub trait PageFetcher {
    fn fetch(&mut self, url: &Url) -> Result<String, CrawlError>;
}

/// Blocking HTTP fetcher. One agent is shared by every request of a run.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(config: &SiteConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(config.connect_timeout_secs))
            .timeout_read(Duration::from_secs(config.read_timeout_secs))
            .user_agent(&config.user_agent)
            .build();
        Self { agent }
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&mut self, url: &Url) -> Result<String, CrawlError> {
        let response = self.agent.get(url.as_str()).call().map_err(|e| match e {
            ureq::Error::Status(status, _) => CrawlError::Status {
                url: url.to_string(),
                status,
            },
            ureq::Error::Transport(transport) => CrawlError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            },
        })?;

        response.into_string().map_err(|source| CrawlError::Body {
            url: url.to_string(),
            source,
        })
    }
}

/// Serves pages from memory and remembers what was asked for.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FixtureFetcher {
    pages: std::collections::HashMap<String, String>,
    pub requests: Vec<String>,
}

#[cfg(test)]
impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn requests_matching(&self, needle: &str) -> usize {
        self.requests.iter().filter(|r| r.contains(needle)).count()
    }
}

#[cfg(test)]
impl PageFetcher for FixtureFetcher {
    fn fetch(&mut self, url: &Url) -> Result<String, CrawlError> {
        self.requests.push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| CrawlError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
