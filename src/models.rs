//! Core data types shared by the web handlers and the CLI.
//!
//! The `sites` table (and the rest of the dump schema — badges, comments,
//! users) is owned by the import tooling; this crate only ever reads from it.

use serde::Serialize;

/// A single imported data dump, exposed as a sub-area of the application.
#[derive(Debug, Clone, Serialize)]
pub struct Site {
    pub id: i64,
    /// URL-safe unique key, e.g. `android.stackexchange.com`.
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    /// Date the dump was taken, as recorded by the importer.
    pub dump_date: Option<String>,
}

impl Site {
    /// Path under the media root where this site's logo would live.
    pub fn logo_path(&self) -> String {
        format!("images/logos/{}.png", self.key)
    }
}

/// One page of matches returned by the search service for a query.
/// Documents are passed through to templates as opaque JSON; their shape
/// is owned by the search index schema.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    /// Total number of matches in the index, not just this page.
    pub num_found: u64,
    /// Zero-based offset of the first document in `docs`.
    pub start: u64,
    pub docs: Vec<serde_json::Value>,
}

impl SearchResults {
    pub fn empty() -> Self {
        Self {
            num_found: 0,
            start: 0,
            docs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_logo_path() {
        let site = Site {
            id: 1,
            key: "android.stackexchange.com".to_string(),
            name: "Android Enthusiasts".to_string(),
            description: None,
            dump_date: None,
        };
        assert_eq!(
            site.logo_path(),
            "images/logos/android.stackexchange.com.png"
        );
    }
}
