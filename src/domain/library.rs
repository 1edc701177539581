use std::collections::HashMap;

use super::album::{Album, AlbumId, TagSet};

/// All albums exported for one user, keyed by album id
#[derive(Debug, Default)]
pub struct Library {
    albums: HashMap<AlbumId, Album>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the album, replacing (and returning) any previous album with the same id.
    pub fn upsert(&mut self, album: Album) -> Option<Album> {
        self.albums.insert(album.id.clone(), album)
    }

    pub fn get(&self, id: &AlbumId) -> Option<&Album> {
        self.albums.get(id)
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    pub fn albums(&self) -> impl Iterator<Item = &Album> {
        self.albums.values()
    }

    /// albums ordered by id, so that exported files are stable between runs
    pub fn sorted_albums(&self) -> Vec<&Album> {
        let mut albums = self.albums.values().collect::<Vec<_>>();
        albums.sort_by(|a, b| a.id.cmp(&b.id));
        albums
    }
}

impl FromIterator<Album> for Library {
    fn from_iter<I: IntoIterator<Item = Album>>(iter: I) -> Self {
        let mut library = Library::new();
        for album in iter {
            library.upsert(album);
        }
        library
    }
}

/// The user's own tags, per album
#[derive(Debug, Default)]
pub struct TagIndex {
    tags: HashMap<AlbumId, TagSet>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// returns false if the album already carried this tag
    pub fn insert(&mut self, album: AlbumId, tag: &str) -> bool {
        self.tags.entry(album).or_default().insert(tag)
    }

    pub fn get(&self, album: &AlbumId) -> Option<&TagSet> {
        self.tags.get(album)
    }

    /// number of albums carrying at least one tag
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
