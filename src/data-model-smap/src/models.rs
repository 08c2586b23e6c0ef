use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{InvalidPriority, UnknownChangeFreq};

/// A named substitution slot (a path placeholder or a query key) and the values it enumerates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl Param {
    pub fn new<N, I, V>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// One chosen value per parameter, kept in parameter declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamAssignment(Vec<(String, String)>);

impl ParamAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value assigned to `name`, if that parameter takes part in this assignment.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value.as_str())
    }

    /// (name, value) pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for ParamAssignment {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Computes a metadata value for one generated URL from `(path, path_params, query_params)`.
///
/// Callbacks must be pure: the same inputs always produce the same output and nothing else is touched.
/// Expansion may call them any number of times, from any thread that holds the `Site`.
pub type Callback<T> = Arc<dyn Fn(&str, &ParamAssignment, &ParamAssignment) -> Option<T> + Send + Sync>;

/// Per-URL metadata: either a literal shared by every URL of a page, or a value computed per URL.
#[derive(Clone)]
pub enum MetaField<T> {
    Fixed(T),
    Computed(Callback<T>),
}

impl<T> MetaField<T> {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&str, &ParamAssignment, &ParamAssignment) -> Option<T> + Send + Sync + 'static,
    {
        MetaField::Computed(Arc::new(f))
    }

    /// Produces the value for a single URL. `None` means the field is omitted from that URL.
    pub fn resolve(&self, path: &str, path_params: &ParamAssignment, query_params: &ParamAssignment) -> Option<T>
    where
        T: Clone,
    {
        match self {
            MetaField::Fixed(value) => Some(value.clone()),
            MetaField::Computed(callback) => callback(path, path_params, query_params),
        }
    }
}

impl<T> From<T> for MetaField<T> {
    fn from(value: T) -> Self {
        MetaField::Fixed(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for MetaField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaField::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            MetaField::Computed(_) => f.write_str("Computed(<callback>)"),
        }
    }
}

/// Site descriptions on disk can only carry literals, so deserialization always yields `Fixed`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for MetaField<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(MetaField::Fixed)
    }
}

/// A page of the site: a path template plus the parameters whose combinations it expands into.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Path appended to the site's base URL. May contain `{name}` placeholders; `{{` and `}}` are literal braces.
    pub path: String,
    #[serde(default)]
    pub query_params: Vec<Param>,
    #[serde(default)]
    pub path_params: Vec<Param>,
    #[serde(default)]
    pub lastmod: Option<MetaField<String>>,
    #[serde(default)]
    pub changefreq: Option<MetaField<ChangeFreq>>,
    /// Validated when each URL is built, not here.
    #[serde(default)]
    pub priority: Option<MetaField<String>>,
}

impl Page {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query_params: Vec::new(),
            path_params: Vec::new(),
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }

    pub fn with_query_param(mut self, param: Param) -> Self {
        self.query_params.push(param);
        self
    }

    pub fn with_path_param(mut self, param: Param) -> Self {
        self.path_params.push(param);
        self
    }

    pub fn with_lastmod(mut self, lastmod: impl Into<String>) -> Self {
        self.lastmod = Some(MetaField::Fixed(lastmod.into()));
        self
    }

    pub fn with_lastmod_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &ParamAssignment, &ParamAssignment) -> Option<String> + Send + Sync + 'static,
    {
        self.lastmod = Some(MetaField::computed(f));
        self
    }

    pub fn with_changefreq(mut self, changefreq: ChangeFreq) -> Self {
        self.changefreq = Some(MetaField::Fixed(changefreq));
        self
    }

    pub fn with_changefreq_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &ParamAssignment, &ParamAssignment) -> Option<ChangeFreq> + Send + Sync + 'static,
    {
        self.changefreq = Some(MetaField::computed(f));
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(MetaField::Fixed(priority.into()));
        self
    }

    pub fn with_priority_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &ParamAssignment, &ParamAssignment) -> Option<String> + Send + Sync + 'static,
    {
        self.priority = Some(MetaField::computed(f));
        self
    }
}

/// The whole site: where it lives and which pages it has.
#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    pub base_url: String,
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Where chunk files are served from, used for sitemap index entries. Defaults to `base_url`.
    #[serde(default)]
    pub sitemap_base_url: Option<String>,
}

impl Site {
    pub fn new(base_url: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            base_url: base_url.into(),
            pages,
            sitemap_base_url: None,
        }
    }

    pub fn with_sitemap_base_url(mut self, sitemap_base_url: impl Into<String>) -> Self {
        self.sitemap_base_url = Some(sitemap_base_url.into());
        self
    }

    pub fn sitemap_base_url(&self) -> &str {
        self.sitemap_base_url.as_deref().unwrap_or(&self.base_url)
    }
}

/// How frequently a page is likely to change, per the sitemaps.org protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFreq {
    type Err = UnknownChangeFreq;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            other => Err(UnknownChangeFreq(other.to_string())),
        }
    }
}

/// A sitemap priority: a decimal in `[0.0, 1.0]`, stored with exactly one decimal place.
/// Only exists for valid values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Priority(String);

impl Priority {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 1.0;

    /// Parses and normalizes `raw`, e.g. `"0.75"` becomes `"0.8"` and `"1"` becomes `"1.0"`.
    /// Ties round to even.
    pub fn new(raw: &str) -> Result<Self, InvalidPriority> {
        let literal = raw.trim();
        let value: f64 = literal.parse().map_err(|_| InvalidPriority::new(raw))?;
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) || !Self::exact_at_bound(literal, value) {
            return Err(InvalidPriority::new(raw));
        }
        // abs() folds "-0" into "0.0"
        let tenths = (value * 10.0).round_ties_even().abs();
        Ok(Priority(format!("{:.1}", tenths / 10.0)))
    }

    /// Parsing can round a literal just outside the range onto `MIN` or `MAX`, e.g. `"1.00000000000000001"`.
    /// Such a value must be exactly the bound, judged on the literal's digits.
    fn exact_at_bound(literal: &str, value: f64) -> bool {
        let mantissa = literal.split(['e', 'E']).next().unwrap_or_default();
        let mut significant = mantissa
            .chars()
            .filter(char::is_ascii_digit)
            .skip_while(|digit| *digit == '0');
        if value == Self::MAX {
            significant.next() == Some('1') && significant.all(|digit| digit == '0')
        } else if value == Self::MIN {
            !literal.starts_with('-') || significant.next().is_none()
        } else {
            true
        }
    }

    /// True if `raw` would be accepted by [`Priority::new`].
    pub fn is_valid(raw: &str) -> bool {
        Self::new(raw).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Destroys the wrapper, obtaining the normalized string.
    pub fn extract(self) -> String {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One `<url>` entry of a sitemap.
// Refer to https://www.sitemaps.org/protocol.html#xmlTagDefinitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteMapUrl {
    /// Fully qualified URL. Stored unescaped; XML escaping happens when written.
    pub loc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<ChangeFreq>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl SiteMapUrl {
    /// Builds a URL entry, validating the priority if one is given.
    pub fn new(
        loc: impl Into<String>,
        lastmod: Option<String>,
        changefreq: Option<ChangeFreq>,
        priority: Option<&str>,
    ) -> Result<Self, InvalidPriority> {
        Ok(Self {
            loc: loc.into(),
            lastmod,
            changefreq,
            priority: priority.map(Priority::new).transpose()?,
        })
    }

    /// A URL entry with only a location.
    pub fn from_loc(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }
}
