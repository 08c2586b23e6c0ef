use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use core_smap::{
    DEFAULT_CHUNK_PREFIX, DEFAULT_INDEX_FILENAME, SaveOptions, SitemapGenerator, common::chunk_size::resolve_chunk_size,
    load_site, setup_logging,
};

#[derive(Parser)]
#[command(name = "smap")]
#[command(about = "Generate XML sitemaps from a declarative site description", long_about = None)]
struct SitemapCli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every URL of the site, one JSON object per line
    Generate {
        /// JSON site description.
        #[arg(short, long, value_parser = validate_input_file)]
        site: PathBuf,
    },

    /// Write sitemap.xml (plus chunk files when the site is large) into a directory
    Save(SaveArgs),
}

#[derive(Args)]
struct SaveArgs {
    /// JSON site description.
    #[arg(short, long, value_parser = validate_input_file)]
    site: PathBuf,
    /// Existing directory to write the sitemap files into.
    #[arg(short, long, value_parser = validate_output_dir)]
    output_dir: PathBuf,
    /// Maximum URLs per file. Falls back to SITEMAP_CHUNK_SIZE, then 50000.
    #[arg(long)]
    chunk_size: Option<usize>,
    /// Base URL for sitemap index entries. Overrides the site description's own.
    #[arg(long, value_parser = validate_url)]
    sitemap_base_url: Option<String>,
    /// File name of the sitemap, or of the index when chunked.
    #[arg(long, default_value = DEFAULT_INDEX_FILENAME)]
    index_filename: String,
    /// Chunk files are named <CHUNK_PREFIX>-<i>.xml
    #[arg(long, default_value = DEFAULT_CHUNK_PREFIX)]
    chunk_prefix: String,
}

fn validate_url(s: &str) -> Result<String, String> {
    url::Url::parse(s)
        .map(|_| s.trim_end_matches('/').to_string())
        .map_err(|e| format!("Invalid URL: {}", e))
}

fn validate_input_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if !path.exists() {
        return Err(format!("Input path does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Input path is not a file: {}", path.display()));
    }

    let metadata = std::fs::metadata(&path).map_err(|e| format!("Cannot read site file metadata: {}", e))?;

    if metadata.len() == 0 {
        return Err(format!("Input file is empty: {}", path.display()));
    }

    Ok(path)
}

fn validate_output_dir(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if !path.exists() {
        return Err(format!("Output directory does not exist: {}", path.display()));
    }

    if !path.is_dir() {
        return Err(format!("Output path is not a directory: {}", path.display()));
    }

    Ok(path)
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file., if it exists
    dotenvy::dotenv().ok();

    setup_logging("core_smap=info,smap=info");

    let cli = SitemapCli::parse();

    match cli.command {
        Commands::Generate { site } => {
            let site = load_site(&site).with_context(|| format!("Cannot load site description {site:?}"))?;
            let generator = SitemapGenerator::new(site);

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for url in generator.iter_urls() {
                serde_json::to_writer(&mut out, &url?)?;
                writeln!(out)?;
            }
            out.flush()?;
        }

        Commands::Save(args) => {
            let site = load_site(&args.site).with_context(|| format!("Cannot load site description {:?}", args.site))?;
            let generator = SitemapGenerator::new(site);

            let chunk_size = resolve_chunk_size(args.chunk_size).context("Invalid chunk size")?;
            let mut builder = SaveOptions::builder()
                .chunk_size(chunk_size)
                .index_filename(args.index_filename)
                .chunk_prefix(args.chunk_prefix);
            if let Some(sitemap_base_url) = args.sitemap_base_url {
                builder = builder.sitemap_base_url(sitemap_base_url);
            }

            match generator.url_count() {
                Some(count) => tracing::info!("Expanding {} URLs from {:?} (chunk size {})", count, args.site, chunk_size),
                None => tracing::info!(
                    "Expanding more than {} URLs from {:?} (chunk size {})",
                    usize::MAX,
                    args.site,
                    chunk_size
                ),
            }
            let report = generator
                .save(&args.output_dir, &builder.build())
                .with_context(|| format!("Failed to save sitemap to {:?}", args.output_dir))?;

            for file in &report.files {
                println!("{}", file.display());
            }
        }
    }

    Ok(())
}
