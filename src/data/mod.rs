/// Data layer: core types, loading, query language and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → AlbumListing
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ AlbumListing  │  Vec<AlbumRow>, raw cell text per Column
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │  filter   │ ◀── │  query    │  search text → Expression per column
///   └──────────┘     └──────────┘
///        │
///        ▼
///   filtered_out flag per row
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod query;
