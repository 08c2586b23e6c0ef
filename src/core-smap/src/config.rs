//! Configuration options for writing sitemap files.

use crate::common::chunk_size;

/// Default file name of the single sitemap, or of the sitemap index when chunking occurs.
pub const DEFAULT_INDEX_FILENAME: &str = "sitemap.xml";

/// Default prefix of chunk file names: `sitemap-0.xml`, `sitemap-1.xml`, ...
pub const DEFAULT_CHUNK_PREFIX: &str = "sitemap";

/// Configuration options for saving a sitemap to disk.
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Maximum number of URLs per sitemap file (default: 50000)
    pub chunk_size: usize,
    /// File name of the single sitemap or of the index (default: sitemap.xml)
    pub index_filename: String,
    /// Chunk files are named `{chunk_prefix}-{i}.xml` (default: sitemap)
    pub chunk_prefix: String,
    /// Base URL that index entries point at. Overrides the site's own sitemap base URL when set.
    pub sitemap_base_url: Option<String>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            chunk_size: chunk_size::DEFAULT,
            index_filename: DEFAULT_INDEX_FILENAME.to_string(),
            chunk_prefix: DEFAULT_CHUNK_PREFIX.to_string(),
            sitemap_base_url: None,
        }
    }
}

impl SaveOptions {
    /// Creates a new builder for SaveOptions.
    pub fn builder() -> SaveOptionsBuilder {
        SaveOptionsBuilder::default()
    }

    /// File name of the `idx`-th chunk.
    pub fn chunk_filename(&self, idx: usize) -> String {
        format!("{}-{}.xml", self.chunk_prefix, idx)
    }
}

/// Builder for SaveOptions.
#[derive(Debug, Clone, Default)]
pub struct SaveOptionsBuilder {
    chunk_size: Option<usize>,
    index_filename: Option<String>,
    chunk_prefix: Option<String>,
    sitemap_base_url: Option<String>,
}

impl SaveOptionsBuilder {
    /// Sets the maximum number of URLs per file.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Sets the file name of the single sitemap / index.
    pub fn index_filename(mut self, index_filename: String) -> Self {
        self.index_filename = Some(index_filename);
        self
    }

    /// Sets the chunk file name prefix.
    pub fn chunk_prefix(mut self, chunk_prefix: String) -> Self {
        self.chunk_prefix = Some(chunk_prefix);
        self
    }

    /// Sets the base URL used in sitemap index entries.
    pub fn sitemap_base_url(mut self, sitemap_base_url: String) -> Self {
        self.sitemap_base_url = Some(sitemap_base_url);
        self
    }

    /// Builds the SaveOptions.
    pub fn build(self) -> SaveOptions {
        SaveOptions {
            chunk_size: self.chunk_size.unwrap_or(chunk_size::DEFAULT),
            index_filename: self
                .index_filename
                .unwrap_or_else(|| DEFAULT_INDEX_FILENAME.to_string()),
            chunk_prefix: self.chunk_prefix.unwrap_or_else(|| DEFAULT_CHUNK_PREFIX.to_string()),
            sitemap_base_url: self.sitemap_base_url,
        }
    }
}
