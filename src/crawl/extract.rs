//! Text heuristics for the rows of an album's info box.
//!
//! A detail row renders as `<value><separator><label>`, e.g. `LP&nbsp;/ Format`.
//! The row is classified by the label it ends with, and the value is what remains
//! after cutting the label and a fixed-width separator. Rows whose label happens to
//! end with a known name are classified as that field, whatever they mean.

use crate::domain::album::{AlbumFields, TagSet};

/// Byte width of the separator between a value and its label (`&nbsp;/ `).
pub const SEPARATOR_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    ReleaseDate,
    Format,
    Label,
    Genres,
}

impl DetailField {
    pub const ALL: [DetailField; 4] = [
        DetailField::ReleaseDate,
        DetailField::Format,
        DetailField::Label,
        DetailField::Genres,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DetailField::ReleaseDate => "Release Date",
            DetailField::Format => "Format",
            DetailField::Label => "Label",
            DetailField::Genres => "Genres",
        }
    }
}

/// Returns the field a row describes and its value, or `None` for unknown or too short rows.
pub fn classify_detail_row(text: &str) -> Option<(DetailField, &str)> {
    let field = DetailField::ALL
        .into_iter()
        .find(|field| text.ends_with(field.label()))?;
    let label_at = text.rfind(field.label())?;
    let value = text.get(..label_at.checked_sub(SEPARATOR_LEN)?)?;
    Some((field, value))
}

/// last four bytes of a release date, e.g. `2023` for `March 3, 2023`
pub fn release_year(date: &str) -> Option<&str> {
    date.get(date.len().checked_sub(4)?..)
}

/// Stores the value of a detail row into `fields`. Unmatched rows are ignored.
pub fn apply_detail_row(fields: &mut AlbumFields, text: &str) {
    let Some((field, value)) = classify_detail_row(text) else {
        return;
    };

    match field {
        DetailField::ReleaseDate => {
            if let Some(year) = release_year(value) {
                fields.release_year = Some(year.to_string());
            }
        }
        DetailField::Format => fields.format = Some(value.to_string()),
        DetailField::Label => fields.label = Some(value.to_string()),
        DetailField::Genres => fields.genres = Some(value.to_string()),
    }
}

/// Adds tag texts verbatim, skipping exact duplicates.
pub fn collect_tags<'a>(tags: &mut TagSet, texts: impl IntoIterator<Item = &'a str>) {
    for text in texts {
        tags.insert(text);
    }
}
