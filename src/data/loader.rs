use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use serde_json::{Map, Value as JsonValue};

use super::model::{AlbumListing, AlbumRow, Column};
use super::query::{parse_instant, parse_number};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an album listing from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row naming the columns (`artist`, `album`, `year`, …)
/// * `.json` – `[{ "artist": ..., "album": ..., ... }, ...]`, or an export
///   object `{ "albums": [...], "listens": [...] }`
pub fn load_file(path: &Path) -> Result<AlbumListing> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let listing = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            parse_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)?
        }
        other => bail!("Unsupported file extension: .{other}"),
    };

    warn_on_suspect_ratings(&listing);
    Ok(listing)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one album per record.
/// Headers are matched with [`Column::from_header`]; unknown headers are
/// ignored and missing columns are left blank.
pub fn parse_csv<R: Read>(input: R) -> Result<AlbumListing> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<Option<Column>> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| {
            let column = Column::from_header(h);
            if column.is_none() {
                log::debug!("ignoring CSV column '{h}'");
            }
            column
        })
        .collect();

    for column in Column::ALL {
        if !headers.contains(&Some(column)) {
            log::warn!("CSV has no '{}' column; its cells will be empty", column.key());
        }
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut row = AlbumRow::default();
        for (value, column) in record.iter().zip(&headers) {
            if let Some(column) = column {
                *row.cell_mut(*column) = value.to_string();
            }
        }
        rows.push(row);
    }

    Ok(AlbumListing::from_rows(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema, either a plain array of album records:
///
/// ```json
/// [
///   { "artist": "The Beatles", "album": "Abbey Road", "year": 1969,
///     "rating": 5, "genre": "Rock", "plays": 12, "last-listen": "2023-06-01" },
///   ...
/// ]
/// ```
///
/// or an export with separate listens, from which `plays` and `last-listen`
/// are derived:
///
/// ```json
/// {
///   "albums":  [{ "artist": "The Beatles", "album": "Abbey Road", ... }],
///   "listens": [{ "artist": "The Beatles", "album": "Abbey Road",
///                 "listen_date": "2023-06-01" }]
/// }
/// ```
pub fn parse_json(text: &str) -> Result<AlbumListing> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    match &root {
        JsonValue::Array(records) => Ok(AlbumListing::from_rows(parse_records(records)?)),
        JsonValue::Object(obj) => {
            let albums = obj
                .get("albums")
                .and_then(|v| v.as_array())
                .context("Expected an 'albums' array")?;
            let mut rows = parse_records(albums)?;

            if let Some(listens) = obj.get("listens") {
                let listens = listens
                    .as_array()
                    .context("'listens' must be an array")?;
                let stats = aggregate_listens(listens)?;
                apply_listen_stats(&mut rows, &stats);
            }

            Ok(AlbumListing::from_rows(rows))
        }
        _ => bail!("Expected top-level JSON array or object"),
    }
}

fn parse_records(records: &[JsonValue]) -> Result<Vec<AlbumRow>> {
    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(record_to_row(obj))
        })
        .collect()
}

fn record_to_row(obj: &Map<String, JsonValue>) -> AlbumRow {
    let mut row = AlbumRow::default();
    for (key, val) in obj {
        match Column::from_header(key) {
            Some(column) => *row.cell_mut(column) = json_to_text(val),
            None => log::debug!("ignoring JSON field '{key}'"),
        }
    }
    row
}

/// Render a JSON value as cell text. Lists (e.g. several genres) are joined
/// with commas.
fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        JsonValue::Array(items) => items
            .iter()
            .map(json_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        JsonValue::Object(_) => val.to_string(),
    }
}

// -- Listen aggregation --

#[derive(Debug, Default, Clone, PartialEq)]
struct ListenStats {
    plays: usize,
    last: Option<NaiveDateTime>,
}

fn album_key(artist: &str, album: &str) -> (String, String) {
    (artist.trim().to_lowercase(), album.trim().to_lowercase())
}

fn aggregate_listens(listens: &[JsonValue]) -> Result<HashMap<(String, String), ListenStats>> {
    let mut stats: HashMap<(String, String), ListenStats> = HashMap::new();

    for (i, listen) in listens.iter().enumerate() {
        let obj = listen
            .as_object()
            .with_context(|| format!("Listen {i} is not a JSON object"))?;
        let field = |name: &str| obj.get(name).map(json_to_text).unwrap_or_default();

        let entry = stats
            .entry(album_key(&field("artist"), &field("album")))
            .or_default();
        entry.plays += 1;

        let date = field("listen_date");
        match parse_instant(&date) {
            Ok(when) => entry.last = entry.last.max(Some(when)),
            Err(e) => log::warn!("Listen {i}: {e}"),
        }
    }

    Ok(stats)
}

fn apply_listen_stats(rows: &mut [AlbumRow], stats: &HashMap<(String, String), ListenStats>) {
    for row in rows {
        let found = stats.get(&album_key(&row.artist, &row.album));
        let ListenStats { plays, last } = found.cloned().unwrap_or_default();
        row.plays = plays.to_string();
        row.last_listen = last
            .map(|when| when.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Ratings live on a 0–5 scale. Out-of-range values are kept as written but
/// reported.
fn warn_on_suspect_ratings(listing: &AlbumListing) {
    for (i, row) in listing.rows.iter().enumerate() {
        if let Ok(rating) = parse_number(&row.rating) {
            if !(0.0..=5.0).contains(&rating) {
                log::warn!(
                    "Row {i} ({} – {}): rating {rating} is not between 0 and 5",
                    row.artist,
                    row.album
                );
            }
        }
    }
}
