use url::Url;

use crate::{
    crawl::{CrawlSession, error::CrawlError, fetch::PageFetcher},
    domain::album::{Album, AlbumId},
};

/// Result of asking for an album page
#[derive(Debug, PartialEq, Eq)]
pub enum AlbumVisit {
    /// page fetched in this call, album populated from it
    Fresh(Album),
    /// page already visited in this session; nothing was fetched
    AlreadyVisited(AlbumId),
}

/// Fetches one album page and builds the album from it.
///
/// A fetched page that lacks some fields still gives `Fresh`, the album is then
/// recorded as incomplete in the session report.
pub fn visit_album<F: PageFetcher>(
    session: &mut CrawlSession<F>,
    url: &Url,
) -> Result<AlbumVisit, CrawlError> {
    let id = AlbumId::from_url(url).ok_or_else(|| CrawlError::InvalidAlbumLink(url.to_string()))?;

    log::debug!("Visiting album {url}");
    let Some(document) = session.visit(url)? else {
        return Ok(AlbumVisit::AlreadyVisited(id));
    };

    let mut album = Album::new(id);
    album.apply(session.parser().parse_album_page(&document));
    log::debug!("Visited {url}");
    log::debug!("Data obtained: {album:?}");

    let missing = album.missing_fields();
    if !missing.is_empty() {
        log::debug!("album {} is missing {}", album.id, missing.join(", "));
        session.report_mut().incomplete.push(album.id.clone());
    }

    Ok(AlbumVisit::Fresh(album))
}
