use url::Url;

use crate::{
    crawl::{
        CrawlSession,
        error::CrawlError,
        fetch::PageFetcher,
        visitor::{AlbumVisit, visit_album},
    },
    domain::library::{Library, TagIndex},
};

#[derive(Debug)]
pub struct ExportOutcome {
    pub library: Library,
    /// number of listing pages fetched
    pub listing_pages: usize,
}

/// Walks the user's library listing page by page and visits every album linked from it.
///
/// With `my_tags` the user's own tags are merged into each album. Pagination stops when
/// a page has no "Next" control, when the next page was already visited in this session,
/// or when a listing page cannot be fetched.
pub fn export_library<F: PageFetcher>(
    session: &mut CrawlSession<F>,
    username: &str,
    my_tags: Option<&TagIndex>,
) -> Result<ExportOutcome, CrawlError> {
    let mut library = Library::new();
    let mut listing_pages = 0;
    let mut next = Some(session.user_url(username, "library")?);

    while let Some(page_url) = next.take() {
        log::debug!("Visiting library {page_url}");
        let document = match session.visit(&page_url) {
            Ok(Some(document)) => document,
            Ok(None) => {
                log::debug!("library page {page_url} already visited, stopping");
                break;
            }
            Err(e) => {
                session.fail(&page_url, e)?;
                break;
            }
        };
        listing_pages += 1;
        let listing = session.parser().parse_listing_page(&document);

        for href in &listing.album_links {
            let Some(album_url) = session.album_url(href) else {
                continue;
            };
            visit_listed_album(session, &album_url, my_tags, &mut library)?;
        }
        log::debug!("Visited library {page_url}");

        next = match listing.next_page.as_deref().map(|href| session.resolve(href)) {
            Some(Ok(url)) => Some(url),
            Some(Err(e)) => {
                session.fail(&page_url, e)?;
                None
            }
            None => None,
        };
    }

    log::info!(
        "Exported {} albums from {listing_pages} library page(s)",
        library.len()
    );
    Ok(ExportOutcome {
        library,
        listing_pages,
    })
}

fn visit_listed_album<F: PageFetcher>(
    session: &mut CrawlSession<F>,
    url: &Url,
    my_tags: Option<&TagIndex>,
    library: &mut Library,
) -> Result<(), CrawlError> {
    match visit_album(session, url) {
        Ok(AlbumVisit::Fresh(mut album)) => {
            if let Some(tags) = my_tags.and_then(|index| index.get(&album.id)) {
                album.merge_my_tags(tags);
            }
            library.upsert(album);
            Ok(())
        }
        Ok(AlbumVisit::AlreadyVisited(id)) => {
            log::debug!("album {id} already visited, skipping {url}");
            session.report_mut().skipped_revisits += 1;
            Ok(())
        }
        Err(e) => session.fail(url, e),
    }
}
