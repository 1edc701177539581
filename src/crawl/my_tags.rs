use url::Url;

use crate::{
    crawl::{CrawlSession, error::CrawlError, fetch::PageFetcher},
    domain::{album::AlbumId, library::TagIndex},
};

/// Builds the index of the user's own tags.
///
/// Only the first page of each tag's album list is read.
pub fn load_my_tags<F: PageFetcher>(
    session: &mut CrawlSession<F>,
    username: &str,
) -> Result<TagIndex, CrawlError> {
    log::debug!("Loading my tags...");
    let mut index = TagIndex::new();

    let mut tags_url = session.user_url(username, "tags")?;
    tags_url.set_query(Some("s=name"));

    let document = match session.visit(&tags_url) {
        Ok(Some(document)) => document,
        Ok(None) => return Ok(index),
        Err(e) => {
            session.fail(&tags_url, e)?;
            return Ok(index);
        }
    };
    let tags = session.parser().parse_tag_list(&document);

    for tag in tags {
        let tag_url = match session.resolve(&tag.href) {
            Ok(url) => url,
            Err(e) => {
                session.fail(&tags_url, e)?;
                continue;
            }
        };

        log::debug!("Loading albums with my tag {}", tag.name);
        let album_ids = match album_ids_for_tag(session, &tag_url) {
            Ok(ids) => ids,
            Err(e) => {
                session.fail(&tag_url, e)?;
                continue;
            }
        };

        for id in album_ids {
            log::debug!("Found album id {id} with my tag {}", tag.name);
            index.insert(id, &tag.name);
        }
    }

    log::info!("Loaded my tags for {} albums", index.len());
    Ok(index)
}

/// ids of the albums listed on a tag page, repeated links included
fn album_ids_for_tag<F: PageFetcher>(
    session: &mut CrawlSession<F>,
    tag_url: &Url,
) -> Result<Vec<AlbumId>, CrawlError> {
    let Some(document) = session.visit(tag_url)? else {
        return Ok(Vec::new());
    };
    let listing = session.parser().parse_listing_page(&document);

    Ok(listing
        .album_links
        .iter()
        .filter_map(|href| session.album_url(href))
        .filter_map(|url| AlbumId::from_url(&url))
        .collect())
}
