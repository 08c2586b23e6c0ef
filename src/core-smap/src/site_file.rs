//! Loading site descriptions from JSON.

use std::path::Path;

use data_model_smap::Site;

use crate::errors::Result;

/// Parses a JSON site description.
///
/// ```
/// let site = core_smap::parse_site(r#"{"base_url": "https://example.com", "pages": [{"path": "/"}]}"#).unwrap();
/// assert_eq!(site.pages.len(), 1);
/// ```
pub fn parse_site(json: &str) -> Result<Site> {
    Ok(serde_json::from_str(json)?)
}

/// Reads and parses a JSON site description file.
pub fn load_site(path: &Path) -> Result<Site> {
    let content = std::fs::read_to_string(path)?;
    parse_site(&content)
}
