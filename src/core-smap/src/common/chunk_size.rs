use std::env::VarError;
use std::num::ParseIntError;

/// Environment variable consulted for the number of URLs per sitemap file.
pub const ENV_VAR: &str = "SITEMAP_CHUNK_SIZE";

/// The default number of URLs per sitemap file: the sitemaps.org per-file limit.
pub const DEFAULT: usize = 50_000;

/// Picks the chunk size: an explicit override wins, then SITEMAP_CHUNK_SIZE, then DEFAULT.
/// A set but malformed environment variable is an error rather than silently ignored.
pub fn resolve_chunk_size(override_value: Option<usize>) -> Result<usize, ChunkSizeError> {
    resolve_chunk_size_from(ENV_VAR, override_value)
}

/// Same as [`resolve_chunk_size`], reading the named environment variable instead of SITEMAP_CHUNK_SIZE.
pub fn resolve_chunk_size_from(env_var_name: &str, override_value: Option<usize>) -> Result<usize, ChunkSizeError> {
    if let Some(value) = override_value {
        return positive(value);
    }
    match chunk_size_from(env_var_name) {
        Ok(value) => Ok(value),
        Err(ChunkSizeError::MissingEnvVar(_)) => Ok(DEFAULT),
        Err(e) => Err(e),
    }
}

/// Retrieves SITEMAP_CHUNK_SIZE as a positive usize.
pub fn chunk_size() -> Result<usize, ChunkSizeError> {
    chunk_size_from(ENV_VAR)
}

/// Retrieves the named environment variable as a positive usize.
pub fn chunk_size_from(env_var_name: &str) -> Result<usize, ChunkSizeError> {
    let value = std::env::var(env_var_name)?.trim().parse::<usize>()?;
    positive(value)
}

fn positive(value: usize) -> Result<usize, ChunkSizeError> {
    if value == 0 {
        Err(ChunkSizeError::NonPositive)
    } else {
        Ok(value)
    }
}

#[derive(Debug)]
pub enum ChunkSizeError {
    ParseIntError(ParseIntError),
    NonPositive,
    MissingEnvVar(VarError),
}

impl std::error::Error for ChunkSizeError {}

impl From<ParseIntError> for ChunkSizeError {
    fn from(error: ParseIntError) -> Self {
        Self::ParseIntError(error)
    }
}

impl From<VarError> for ChunkSizeError {
    fn from(error: VarError) -> Self {
        Self::MissingEnvVar(error)
    }
}

impl std::fmt::Display for ChunkSizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::ParseIntError(e) => write!(f, "Failed to parse chunk size as an integer: {}", e),
            Self::NonPositive => write!(f, "Chunk size must be a positive number"),
            Self::MissingEnvVar(e) => write!(f, "Environment variable {} is missing: {}", ENV_VAR, e),
        }
    }
}
