//! Entry point tying URL expansion to sitemap writing for one site.

use std::path::Path;

use data_model_smap::{Site, SiteMapUrl};

use crate::config::SaveOptions;
use crate::errors::Result;
use crate::expand::{SiteUrls, expand_site, page_url_count};
use crate::writer::{SaveReport, save};

/// Generates the sitemap of a site: as a lazy iterator, as a list, or straight to disk.
///
/// Holds no state besides the site, so each call starts from scratch and always yields the same URLs in
/// the same order (provided the site's callbacks are pure).
#[derive(Debug, Clone)]
pub struct SitemapGenerator {
    site: Site,
}

impl SitemapGenerator {
    pub fn new(site: Site) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Lazily produces every URL of the site. Iteration stops after the first error.
    pub fn iter_urls(&self) -> SiteUrls<'_> {
        expand_site(&self.site)
    }

    /// Every URL of the site, in order.
    ///
    /// # Errors
    ///
    /// `InvalidPriority` or `MissingPathParameter` from the first URL that cannot be built.
    pub fn generate(&self) -> Result<Vec<SiteMapUrl>> {
        self.iter_urls().collect()
    }

    /// Number of URLs the site expands into, computed without building any of them.
    /// `None` if the count does not fit in a `usize`.
    pub fn url_count(&self) -> Option<usize> {
        self.site
            .pages
            .iter()
            .try_fold(0usize, |total, page| total.checked_add(page_url_count(page)?))
    }

    /// Writes the sitemap into `dirname`, splitting it into chunks plus an index when it exceeds
    /// `options.chunk_size` URLs. See [`crate::writer::save`].
    pub fn save(&self, dirname: impl AsRef<Path>, options: &SaveOptions) -> Result<SaveReport> {
        let dirname = dirname.as_ref();
        tracing::debug!(
            "Saving sitemap for {} ({} pages) to {}",
            self.site.base_url,
            self.site.pages.len(),
            dirname.display()
        );
        let report = save(self.iter_urls(), dirname, self.site.sitemap_base_url(), options)?;
        tracing::info!(
            "Wrote {} URLs across {} file(s) to {}",
            report.url_count,
            report.files.len(),
            dirname.display()
        );
        Ok(report)
    }
}
