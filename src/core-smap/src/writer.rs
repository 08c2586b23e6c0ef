//! Serialization of sitemap URLs into sitemaps.org XML documents, split across files when needed.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use data_model_smap::SiteMapUrl;
use quick_xml::escape::escape;

use crate::config::SaveOptions;
use crate::errors::{Result, SitemapError};

/// The sitemaps.org 0.9 namespace.
pub const SITEMAP_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// What a call to [`save`] put on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Every file written, in the order written. The index, if any, comes last.
    pub files: Vec<PathBuf>,
    /// The sitemap index, when the URLs did not fit into a single file.
    pub index: Option<PathBuf>,
    /// Number of URLs written across all files.
    pub url_count: usize,
}

/// Writes a complete `<urlset>` document. Only the non-empty fields of each URL are written,
/// in the order `loc, lastmod, changefreq, priority`.
pub fn write_urlset<W: Write>(out: &mut W, urls: &[SiteMapUrl]) -> io::Result<()> {
    write!(out, r#"{XML_DECLARATION}<urlset xmlns="{SITEMAP_XMLNS}">"#)?;
    for url in urls {
        write_url(out, url)?;
    }
    out.write_all(b"</urlset>")
}

fn write_url<W: Write>(out: &mut W, url: &SiteMapUrl) -> io::Result<()> {
    write!(out, "<url><loc>{}</loc>", escape(url.loc.as_str()))?;
    if let Some(lastmod) = &url.lastmod {
        write!(out, "<lastmod>{}</lastmod>", escape(lastmod.as_str()))?;
    }
    if let Some(changefreq) = &url.changefreq {
        write!(out, "<changefreq>{changefreq}</changefreq>")?;
    }
    if let Some(priority) = &url.priority {
        write!(out, "<priority>{priority}</priority>")?;
    }
    out.write_all(b"</url>")
}

/// Writes a complete `<sitemapindex>` document pointing at each of `locations`, in order.
pub fn write_index<W: Write, S: AsRef<str>>(out: &mut W, locations: &[S]) -> io::Result<()> {
    write!(out, r#"{XML_DECLARATION}<sitemapindex xmlns="{SITEMAP_XMLNS}">"#)?;
    for location in locations {
        write!(out, "<sitemap><loc>{}</loc></sitemap>", escape(location.as_ref()))?;
    }
    out.write_all(b"</sitemapindex>")
}

/// The `<urlset>` document for `urls`, in memory.
pub fn render_urlset(urls: &[SiteMapUrl]) -> Result<String> {
    let mut buf = Vec::new();
    write_urlset(&mut buf, urls)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// The `<sitemapindex>` document for `locations`, in memory.
pub fn render_index<S: AsRef<str>>(locations: &[S]) -> Result<String> {
    let mut buf = Vec::new();
    write_index(&mut buf, locations)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_file<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut out = BufWriter::new(File::create(path)?);
    body(&mut out)?;
    out.flush()?;
    Ok(())
}

fn save_chunk(dirname: &Path, options: &SaveOptions, idx: usize, chunk: &[SiteMapUrl]) -> Result<PathBuf> {
    let path = dirname.join(options.chunk_filename(idx));
    write_file(&path, |out| write_urlset(out, chunk))?;
    tracing::debug!("Wrote chunk {} ({} URLs) to {}", idx, chunk.len(), path.display());
    Ok(path)
}

/// Writes `urls` into `dirname`, at most `options.chunk_size` per file.
///
/// - No URLs: nothing is written.
/// - Up to `chunk_size` URLs: a single `options.index_filename` sitemap.
/// - More: `{chunk_prefix}-0.xml`, `{chunk_prefix}-1.xml`, ... plus an `options.index_filename`
///   sitemap index whose entries are `{sitemap_base_url}/{chunk_prefix}-{i}.xml`.
///
/// `urls` is consumed one at a time; at most one chunk is held in memory.
/// `sitemap_base_url` is used for index entries unless `options.sitemap_base_url` is set.
///
/// # Errors
///
/// The first error yielded by `urls`, or any I/O error, aborts the save. Files already written stay on disk.
pub fn save<I>(urls: I, dirname: &Path, sitemap_base_url: &str, options: &SaveOptions) -> Result<SaveReport>
where
    I: IntoIterator<Item = Result<SiteMapUrl>>,
{
    if options.chunk_size == 0 {
        return Err(SitemapError::InvalidChunkSize(options.chunk_size));
    }
    let sitemap_base_url = options.sitemap_base_url.as_deref().unwrap_or(sitemap_base_url);

    let mut report = SaveReport::default();
    let mut chunk: Vec<SiteMapUrl> = Vec::new();
    let mut idx = 0;

    for url in urls {
        let url = url?;
        if chunk.len() == options.chunk_size {
            report.files.push(save_chunk(dirname, options, idx, &chunk)?);
            idx += 1;
            chunk.clear();
        }
        chunk.push(url);
        report.url_count += 1;
    }

    if chunk.is_empty() {
        return Ok(report);
    }

    if idx == 0 {
        let path = dirname.join(&options.index_filename);
        write_file(&path, |out| write_urlset(out, &chunk))?;
        report.files.push(path);
        return Ok(report);
    }

    report.files.push(save_chunk(dirname, options, idx, &chunk)?);

    let locations: Vec<String> = (0..=idx)
        .map(|i| format!("{}/{}", sitemap_base_url, options.chunk_filename(i)))
        .collect();
    let index = dirname.join(&options.index_filename);
    write_file(&index, |out| write_index(out, &locations))?;
    report.files.push(index.clone());
    report.index = Some(index);

    Ok(report)
}
