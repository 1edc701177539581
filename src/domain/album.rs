use std::fmt::Display;

use serde::{Deserialize, Serialize};
use url::Url;

/// Identifier of an album on the site.
///
/// It is the leading part of the album page slug, e.g. `12345` for
/// `/album/12345-artist-title.php`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumId(String);

impl AlbumId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Finds the `album` path segment and takes the next segment up to its first hyphen.
    /// A slug without a hyphen is taken whole.
    pub fn from_url(url: &Url) -> Option<Self> {
        let mut segments = url.path_segments()?;
        segments.find(|segment| *segment == "album")?;
        let slug = segments.next()?;
        let id = slug.split('-').next().unwrap_or_default();
        if id.is_empty() {
            None
        } else {
            Some(Self(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AlbumId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Insertion-ordered set of tags. Comparison is exact and case sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// returns false if the tag was already present
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend_from(&mut self, other: &TagSet) {
        for tag in other.iter() {
            self.insert(tag);
        }
    }
}

impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        let mut set = TagSet::new();
        for tag in tags {
            set.insert(tag);
        }
        set
    }
}

impl From<TagSet> for Vec<String> {
    fn from(set: TagSet) -> Self {
        set.0
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

/// Fields scraped from one album page. `None` means the page had nothing for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumFields {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub release_year: Option<String>,
    pub format: Option<String>,
    pub label: Option<String>,
    pub genres: Option<String>,
    pub tags: TagSet,
}

/// One exported album
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub artist: String,
    pub title: String,
    pub release_year: String,
    pub format: String,
    pub label: String,
    pub genres: String,
    pub tags: TagSet,
    pub my_tags: TagSet,
}

impl Album {
    pub fn new(id: AlbumId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Copies every scraped field into the album. Fields missing from `fields` keep their value.
    pub fn apply(&mut self, fields: AlbumFields) {
        let AlbumFields {
            artist,
            title,
            release_year,
            format,
            label,
            genres,
            tags,
        } = fields;

        let slots = [
            (&mut self.artist, artist),
            (&mut self.title, title),
            (&mut self.release_year, release_year),
            (&mut self.format, format),
            (&mut self.label, label),
            (&mut self.genres, genres),
        ];
        for (slot, value) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
        self.tags.extend_from(&tags);
    }

    pub fn merge_my_tags(&mut self, tags: &TagSet) {
        self.my_tags.extend_from(tags);
    }

    /// names of the text fields that are still empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("artist", &self.artist),
            ("title", &self.title),
            ("release_year", &self.release_year),
            ("format", &self.format),
            ("label", &self.label),
            ("genres", &self.genres),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
