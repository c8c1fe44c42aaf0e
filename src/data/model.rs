use std::fmt;

// ---------------------------------------------------------------------------
// Column – a filterable attribute shared by every row
// ---------------------------------------------------------------------------

/// How a column's filter clauses are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Case-insensitive substring match only.
    Text,
    /// Relational operators compare parsed numbers.
    Numeric,
    /// Relational operators compare parsed calendar dates.
    Date,
}

impl ColumnKind {
    /// Whether `<`, `>=`, … clauses are recognised for this kind.
    pub fn is_comparable(self) -> bool {
        !matches!(self, ColumnKind::Text)
    }
}

/// The statically enumerated columns of the album table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Artist,
    Album,
    Year,
    Rating,
    Genre,
    Plays,
    LastListen,
}

impl Column {
    pub const COUNT: usize = 7;

    /// Display order.
    pub const ALL: [Column; Column::COUNT] = [
        Column::Artist,
        Column::Album,
        Column::Year,
        Column::Rating,
        Column::Genre,
        Column::Plays,
        Column::LastListen,
    ];

    /// Position in [`Column::ALL`], used to index per-column arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable identifier, also the expected header in CSV/JSON files.
    pub fn key(self) -> &'static str {
        match self {
            Column::Artist => "artist",
            Column::Album => "album",
            Column::Year => "year",
            Column::Rating => "rating",
            Column::Genre => "genre",
            Column::Plays => "plays",
            Column::LastListen => "last-listen",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::Artist => "Artist",
            Column::Album => "Album",
            Column::Year => "Year",
            Column::Rating => "Rating",
            Column::Genre => "Genre",
            Column::Plays => "Plays",
            Column::LastListen => "Last listen",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Artist | Column::Album | Column::Genre => ColumnKind::Text,
            Column::Year | Column::Rating | Column::Plays => ColumnKind::Numeric,
            Column::LastListen => ColumnKind::Date,
        }
    }

    /// Resolve a file header to a column. Matching ignores case, surrounding
    /// whitespace and the `-`/`_`/space spelling of multi-word names.
    pub fn from_header(header: &str) -> Option<Column> {
        let normalized: String = header
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();

        match normalized.as_str() {
            "artist" | "artist-name" => Some(Column::Artist),
            "album" | "album-name" | "name" => Some(Column::Album),
            "year" => Some(Column::Year),
            "rating" => Some(Column::Rating),
            "genre" | "genres" => Some(Column::Genre),
            "plays" | "listens" | "play-count" => Some(Column::Plays),
            "last-listen" | "last-listened" | "last-listen-date" => Some(Column::LastListen),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// AlbumRow – one line of the listing
// ---------------------------------------------------------------------------

/// A single album as shown in the table. Every cell is kept as the raw text
/// the listing supplied; typed interpretation happens in the query layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlbumRow {
    pub artist: String,
    pub album: String,
    pub year: String,
    pub rating: String,
    pub genre: String,
    pub plays: String,
    pub last_listen: String,
}

impl AlbumRow {
    pub fn cell(&self, column: Column) -> &str {
        match column {
            Column::Artist => &self.artist,
            Column::Album => &self.album,
            Column::Year => &self.year,
            Column::Rating => &self.rating,
            Column::Genre => &self.genre,
            Column::Plays => &self.plays,
            Column::LastListen => &self.last_listen,
        }
    }

    pub fn cell_mut(&mut self, column: Column) -> &mut String {
        match column {
            Column::Artist => &mut self.artist,
            Column::Album => &mut self.album,
            Column::Year => &mut self.year,
            Column::Rating => &mut self.rating,
            Column::Genre => &mut self.genre,
            Column::Plays => &mut self.plays,
            Column::LastListen => &mut self.last_listen,
        }
    }

    /// YouTube search for "<album> <artist>", form-encoded.
    pub fn youtube_search_link(&self) -> String {
        format!(
            "https://www.youtube.com/results?search_query={}+{}",
            quote_plus(&self.album),
            quote_plus(&self.artist)
        )
    }
}

/// Percent-encode with spaces as `+`.
fn quote_plus(s: &str) -> String {
    s.split(' ')
        .map(|part| urlencoding::encode(part).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

// ---------------------------------------------------------------------------
// AlbumListing – the complete loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct AlbumListing {
    /// Rows in display order.
    pub rows: Vec<AlbumRow>,
}

impl AlbumListing {
    pub fn from_rows(rows: Vec<AlbumRow>) -> Self {
        AlbumListing { rows }
    }

    /// Number of albums.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the listing is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index_matches_all_order() {
        for (i, col) in Column::ALL.iter().enumerate() {
            assert_eq!(col.index(), i);
        }
    }

    #[test]
    fn test_column_kinds() {
        assert_eq!(Column::Artist.kind(), ColumnKind::Text);
        assert_eq!(Column::Genre.kind(), ColumnKind::Text);
        assert_eq!(Column::Year.kind(), ColumnKind::Numeric);
        assert_eq!(Column::Plays.kind(), ColumnKind::Numeric);
        assert_eq!(Column::LastListen.kind(), ColumnKind::Date);
        assert!(!ColumnKind::Text.is_comparable());
        assert!(ColumnKind::Date.is_comparable());
    }

    #[test]
    fn test_from_header_aliases() {
        assert_eq!(Column::from_header(" Artist "), Some(Column::Artist));
        assert_eq!(Column::from_header("genres"), Some(Column::Genre));
        assert_eq!(Column::from_header("last_listen"), Some(Column::LastListen));
        assert_eq!(Column::from_header("Last Listen"), Some(Column::LastListen));
        assert_eq!(Column::from_header("last-listen"), Some(Column::LastListen));
        assert_eq!(Column::from_header("comment"), None);
    }

    #[test]
    fn test_cell_mut_writes_through() {
        let mut row = AlbumRow::default();
        *row.cell_mut(Column::Year) = "1969".to_string();
        assert_eq!(row.cell(Column::Year), "1969");
        assert_eq!(row.year, "1969");
    }

    #[test]
    fn test_youtube_search_link_encodes_spaces_as_plus() {
        let row = AlbumRow {
            artist: "The Beatles".to_string(),
            album: "Abbey Road".to_string(),
            ..Default::default()
        };
        assert_eq!(
            row.youtube_search_link(),
            "https://www.youtube.com/results?search_query=Abbey+Road+The+Beatles"
        );
    }

    #[test]
    fn test_youtube_search_link_escapes_reserved_characters() {
        let row = AlbumRow {
            artist: "AC/DC".to_string(),
            album: "Back & Black".to_string(),
            ..Default::default()
        };
        assert_eq!(
            row.youtube_search_link(),
            "https://www.youtube.com/results?search_query=Back+%26+Black+AC%2FDC"
        );
    }
}
