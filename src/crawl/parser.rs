//! HTML side of the crawl: turns fetched pages into plain data.

use scraper::{ElementRef, Html, Selector};

use crate::{
    crawl::{
        error::CrawlError,
        extract::{apply_detail_row, collect_tags},
    },
    domain::album::AlbumFields,
};

/// Text shown by the pagination control leading to the next page
const NEXT_PAGE_TEXT: &str = "Next";

/// Links found on a listing page (library or per-tag album list)
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// hrefs of every link inside an album block, in document order
    pub album_links: Vec<String>,
    pub next_page: Option<String>,
}

/// one entry of the user's tag list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLink {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone)]
pub struct PageParser {
    artist: Selector,
    title: Selector,
    detail_row: Selector,
    tag: Selector,
    album_link: Selector,
    page_select_link: Selector,
    page_select: Selector,
    user_tag_link: Selector,
}

fn selector(css: &str) -> Result<Selector, CrawlError> {
    Selector::parse(css).map_err(|_| CrawlError::Selector(css.to_string()))
}

/// concatenation of all text nodes below the element, untrimmed
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

impl PageParser {
    pub fn new() -> Result<Self, CrawlError> {
        Ok(Self {
            artist: selector("div.albumHeadline div.artist")?,
            title: selector("div.albumHeadline div.albumTitle")?,
            detail_row: selector("div.albumTopBox.info div.detailRow")?,
            tag: selector("div.albumTopBox.info div.tag.strong")?,
            album_link: selector("div.albumBlock a[href]")?,
            page_select_link: selector("div.pageSelectRow a[href]")?,
            page_select: selector("div.pageSelect")?,
            user_tag_link: selector("div.tag a[href]")?,
        })
    }

    /// Extracts every known field from an album page.
    pub fn parse_album_page(&self, document: &Html) -> AlbumFields {
        let mut fields = AlbumFields {
            artist: document.select(&self.artist).next().map(text_of),
            title: document.select(&self.title).next().map(text_of),
            ..Default::default()
        };

        for row in document.select(&self.detail_row) {
            apply_detail_row(&mut fields, &text_of(row));
        }

        let tags = document.select(&self.tag).map(text_of).collect::<Vec<_>>();
        collect_tags(&mut fields.tags, tags.iter().map(String::as_str));

        fields
    }

    pub fn parse_listing_page(&self, document: &Html) -> ListingPage {
        let album_links = document
            .select(&self.album_link)
            .filter_map(|link| link.value().attr("href"))
            .map(str::to_string)
            .collect();

        let next_page = document
            .select(&self.page_select_link)
            .find(|link| {
                link.select(&self.page_select)
                    .any(|control| text_of(control) == NEXT_PAGE_TEXT)
            })
            .and_then(|link| link.value().attr("href"))
            .map(str::to_string);

        ListingPage {
            album_links,
            next_page,
        }
    }

    pub fn parse_tag_list(&self, document: &Html) -> Vec<TagLink> {
        document
            .select(&self.user_tag_link)
            .filter_map(|link| {
                let href = link.value().attr("href")?;
                Some(TagLink {
                    name: text_of(link),
                    href: href.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn album_page_fields_are_extracted() {
        let parser = PageParser::new().unwrap();
        let document = parse(include_str!("../../testdata/album_1001.html"));

        let fields = parser.parse_album_page(&document);

        assert_eq!(fields.artist.as_deref(), Some("Boards of Canada"));
        assert_eq!(fields.title.as_deref(), Some("Music Has the Right to Children"));
        assert_eq!(fields.release_year.as_deref(), Some("1998"));
        assert_eq!(fields.format.as_deref(), Some("Vinyl, 12\""));
        assert_eq!(fields.label.as_deref(), Some("Warp"));
        assert_eq!(fields.genres.as_deref(), Some("IDM, Ambient"));
        assert_eq!(
            fields.tags.iter().collect::<Vec<_>>(),
            vec!["nostalgic", "hazy"]
        );
    }

    #[test]
    fn empty_page_leaves_fields_unset() {
        let parser = PageParser::new().unwrap();
        let fields = parser.parse_album_page(&parse("<html><body></body></html>"));
        assert_eq!(fields, AlbumFields::default());
    }

    #[test]
    fn tags_outside_the_info_box_are_ignored() {
        let parser = PageParser::new().unwrap();
        let document = parse(
            r#"<div class="albumTopBox info"><div class="tag strong">warm</div></div>
               <div class="tag strong">sidebar</div>"#,
        );
        let fields = parser.parse_album_page(&document);
        assert_eq!(fields.tags.iter().collect::<Vec<_>>(), vec!["warm"]);
    }

    #[test]
    fn listing_page_links_and_next_control() {
        let parser = PageParser::new().unwrap();
        let document = parse(include_str!("../../testdata/library_page1.html"));

        let listing = parser.parse_listing_page(&document);

        assert_eq!(
            listing.album_links,
            vec![
                "/album/1001-boards-of-canada-music-has-the-right-to-children.php",
                "/album/1001-boards-of-canada-music-has-the-right-to-children.php",
                "/album/1002-aphex-twin-selected-ambient-works-85-92.php",
                "/artist/7-aphex-twin/",
            ]
        );
        assert_eq!(
            listing.next_page.as_deref(),
            Some("/user/alice/library/2/")
        );
    }

    #[test]
    fn previous_control_is_not_followed() {
        let parser = PageParser::new().unwrap();
        let document = parse(
            r#"<div class="pageSelectRow">
                 <a href="/user/alice/library/1/"><div class="pageSelect">Previous</div></a>
               </div>"#,
        );
        assert_eq!(parser.parse_listing_page(&document).next_page, None);
    }

    #[test]
    fn tag_list_pairs_names_with_links() {
        let parser = PageParser::new().unwrap();
        let document = parse(include_str!("../../testdata/tags.html"));

        let tags = parser.parse_tag_list(&document);

        assert_eq!(
            tags,
            vec![
                TagLink {
                    name: "favourites".to_string(),
                    href: "/user/alice/tag/favourites/".to_string(),
                },
                TagLink {
                    name: "late night".to_string(),
                    href: "/user/alice/tag/late-night/".to_string(),
                },
            ]
        );
    }
}
