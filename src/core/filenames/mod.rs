//! Depot file names
//!
//! Scrapes a depot's file list from the metadata website and builds the
//! name-hash lookup table used to recover manifest file names.

mod selectors;

use crate::config::Config;
use crate::util::{hash, http, path};
use anyhow::{Context, Result};
use scraper::Html;
use std::collections::HashMap;

/// Scraping failures
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("page format mismatch: no file list found in depot page")]
    PageFormatMismatch,
    #[error("no manifest id given and none found in depot page")]
    MissingManifestId,
    #[error("invalid manifest id in depot page: {0:?}")]
    InvalidManifestId(String),
}

/// Lookup from name-hash to recovered file name
#[derive(Debug, Clone, Default)]
pub struct FileNameTable {
    names: HashMap<String, String>,
    order: Vec<String>,
    /// Most recent manifest id listed on the depot page, as scraped
    pub page_manifest_id: Option<String>,
}

impl FileNameTable {
    /// Build a table from raw paths
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for raw in paths {
            table.insert(raw.as_ref());
        }
        table
    }

    /// Normalize and hash a path, then store it under its name-hash
    pub fn insert(&mut self, raw: &str) {
        let name = path::to_windows(raw);
        let key = hash::name_hash(&name);
        if self.names.insert(key.clone(), name).is_none() {
            self.order.push(key);
        }
    }

    /// Look up a recovered name by name-hash
    pub fn get(&self, name_hash: &str) -> Option<&str> {
        self.names.get(name_hash).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Manifest id to download
    ///
    /// An explicit id wins; the page id is only parsed when none is given.
    pub fn manifest_id(&self, explicit: Option<u64>) -> Result<u64, ScrapeError> {
        if let Some(id) = explicit {
            return Ok(id);
        }
        let text = self
            .page_manifest_id
            .as_deref()
            .ok_or(ScrapeError::MissingManifestId)?;
        text.parse::<u64>()
            .map_err(|_| ScrapeError::InvalidManifestId(text.to_string()))
    }

    /// Iterate `(name_hash, name)` pairs in page order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(|key| (key.as_str(), self.names[key].as_str()))
    }
}

/// Depot page URL on the metadata website
pub fn depot_page_url(config: &Config, depot_id: u32) -> String {
    format!(
        "{}/depot/{}/",
        config.endpoints.metadata_url.trim_end_matches('/'),
        depot_id
    )
}

/// Fetch and parse the file list for a depot
pub async fn fetch_filename_table(
    client: &reqwest::Client,
    config: &Config,
    depot_id: u32,
) -> Result<FileNameTable> {
    let url = depot_page_url(config, depot_id);
    tracing::info!("Fetching file names for depot {}", depot_id);

    let html = http::get_text(client, &url)
        .await
        .context("Failed to fetch depot page")?;
    let table = parse_filename_page(&html)?;

    tracing::info!(
        "Recovered {} file names (manifest id: {:?})",
        table.len(),
        table.page_manifest_id
    );
    Ok(table)
}

/// Extract the file list and manifest id from a depot page
///
/// The file list is read from the `file-tree` table when present, else from
/// embedded JSON. A page with neither is a format mismatch.
pub fn parse_filename_page(html: &str) -> Result<FileNameTable, ScrapeError> {
    let document = Html::parse_document(html);

    let mut paths = table_paths(&document);
    if paths.is_empty() {
        paths = json_paths(&document);
    }
    if paths.is_empty() {
        return Err(ScrapeError::PageFormatMismatch);
    }

    let mut table = FileNameTable::from_paths(&paths);
    table.page_manifest_id = manifest_id(&document);
    Ok(table)
}

/// First-column text of every `file-tree` row
fn table_paths(document: &Html) -> Vec<String> {
    document
        .select(&selectors::FILE_TREE_NAME_CELL)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Paths from the first embedded JSON document carrying a `files` array
fn json_paths(document: &Html) -> Vec<String> {
    for script in document.select(&selectors::JSON_SCRIPT) {
        let text = script.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
            tracing::debug!("Skipping unparsable JSON script block");
            continue;
        };
        let Some(files) = value.get("files").and_then(|f| f.as_array()) else {
            continue;
        };

        return files
            .iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s.as_str()),
                serde_json::Value::Object(obj) => obj
                    .get("path")
                    .or_else(|| obj.get("name"))
                    .and_then(|v| v.as_str()),
                _ => None,
            })
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
    Vec::new()
}

/// Text of the first non-empty cell following the `Manifest ID` label
fn manifest_id(document: &Html) -> Option<String> {
    let mut cells = document
        .select(&selectors::TABLE_CELL)
        .map(|cell| cell.text().collect::<String>().trim().to_string());

    cells.by_ref().find(|text| text == "Manifest ID")?;
    cells.find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::path::tests::mixed_path;
    use proptest::prelude::*;

    const TABLE_PAGE: &str = r#"
        <html><body>
        <table class="table">
          <tr><td>Depot ID</td><td>228990</td></tr>
          <tr><td>Manifest ID</td><td>1829726630299308803</td></tr>
        </table>
        <table class="table file-tree">
          <thead><tr><th>Name</th><th>Size</th></tr></thead>
          <tbody>
            <tr><td>Data/readme.txt</td><td>0 B</td></tr>
            <tr><td>bin\game.exe</td><td>12 MiB</td></tr>
          </tbody>
        </table>
        </body></html>
    "#;

    const JSON_PAGE: &str = r#"
        <html><body>
        <script type="application/json">{"unrelated": true}</script>
        <script type="application/json">
          {"files": ["Data/readme.txt", {"path": "bin\\game.exe"}, 42]}
        </script>
        </body></html>
    "#;

    #[test]
    fn test_parse_table_page() {
        let table = parse_filename_page(TABLE_PAGE).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.manifest_id(None).unwrap(), 1829726630299308803);

        let key = hash::name_hash("Data\\readme.txt");
        assert_eq!(table.get(&key), Some("Data\\readme.txt"));

        let names: Vec<&str> = table.iter().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["Data\\readme.txt", "bin\\game.exe"]);
    }

    #[test]
    fn test_parse_json_page() {
        let table = parse_filename_page(JSON_PAGE).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.page_manifest_id, None);
        assert!(matches!(
            table.manifest_id(None),
            Err(ScrapeError::MissingManifestId)
        ));
        assert_eq!(table.manifest_id(Some(7)).unwrap(), 7);
        assert_eq!(
            table.get(&hash::name_hash("bin\\game.exe")),
            Some("bin\\game.exe")
        );
    }

    #[test]
    fn test_page_without_files_is_mismatch() {
        let result = parse_filename_page("<html><body><p>Rate limited</p></body></html>");
        assert!(matches!(result, Err(ScrapeError::PageFormatMismatch)));
    }

    #[test]
    fn test_invalid_manifest_id_keeps_file_list() {
        let page = TABLE_PAGE.replace("1829726630299308803", "1829726630299308803 (public)");
        let table = parse_filename_page(&page).unwrap();
        assert_eq!(table.len(), 2);

        assert_eq!(table.manifest_id(Some(42)).unwrap(), 42);
        assert!(matches!(
            table.manifest_id(None),
            Err(ScrapeError::InvalidManifestId(ref s)) if s == "1829726630299308803 (public)"
        ));
    }

    #[test]
    fn test_manifest_id_skips_empty_cells() {
        let page = TABLE_PAGE.replace(
            "<td>Manifest ID</td><td>",
            "<td>Manifest ID</td><td> </td><td>",
        );
        let table = parse_filename_page(&page).unwrap();
        assert_eq!(table.manifest_id(None).unwrap(), 1829726630299308803);
    }

    #[test]
    fn test_duplicate_paths_keep_first_position() {
        let table = FileNameTable::from_paths(["a/b", "c", "A\\B"]);
        assert_eq!(table.len(), 2);
        let names: Vec<&str> = table.iter().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["A\\B", "c"]);
    }

    #[test]
    fn test_depot_page_url() {
        let mut config = Config::default();
        config.endpoints.metadata_url = "http://localhost:8000/".to_string();
        assert_eq!(depot_page_url(&config, 228990), "http://localhost:8000/depot/228990/");
    }

    proptest! {
        #[test]
        fn test_name_hash_stable_across_case_and_separators(path in mixed_path()) {
            let mut table = FileNameTable::default();
            table.insert(&path);

            let stored = path::to_windows(&path);
            prop_assert_eq!(table.get(&hash::name_hash(&stored)), Some(stored.as_str()));

            let variants = [
                path.to_uppercase(),
                path.to_lowercase(),
                path.replace('\\', "/"),
                path.replace('/', "\\"),
            ];
            for variant in variants {
                let key = hash::name_hash(&path::to_windows(&variant));
                prop_assert_eq!(table.get(&key), Some(stored.as_str()));
            }
        }
    }
}
