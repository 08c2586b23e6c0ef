//! Expansion of page definitions into concrete sitemap URLs.
//!
//! Every page expands into the cartesian product of its path parameter assignments and its query
//! parameter assignments. Path assignments vary slowest: all query assignments are enumerated for
//! the first path assignment before moving to the next one. Within one parameter list, the first
//! parameter varies slowest.
//!
//! A parameter declared with no values is left out of the product, as if it had not been declared.
//! A list with no (remaining) parameters contributes exactly one, empty, assignment.

use std::sync::LazyLock;

use data_model_smap::{Page, Param, ParamAssignment, Site, SiteMapUrl};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

use crate::errors::{Result, SitemapError};

/// `{{`, `}}`, or a `{name}` placeholder.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}").expect("placeholder pattern is a valid regex"));

/// Bytes left literal in query keys and values: alphanumerics, `_.-~`, and the space that becomes `+`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b' ');

/// Lazily enumerates every assignment of a parameter list, odometer style.
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    params: Vec<&'a Param>,
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a> Combinations<'a> {
    pub fn new(params: &'a [Param]) -> Self {
        let params: Vec<&Param> = params.iter().filter(|param| !param.values.is_empty()).collect();
        let indices = vec![0; params.len()];
        Self {
            params,
            indices,
            exhausted: false,
        }
    }

    /// Total number of assignments, regardless of how many were already produced.
    /// `None` if it does not fit in a `usize`.
    pub fn total(&self) -> Option<usize> {
        self.params
            .iter()
            .try_fold(1usize, |total, param| total.checked_mul(param.values.len()))
    }
}

impl Iterator for Combinations<'_> {
    type Item = ParamAssignment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let assignment = self
            .params
            .iter()
            .zip(&self.indices)
            .map(|(param, &i)| (param.name.clone(), param.values[i].clone()))
            .collect();

        // Advance from the last parameter; carrying past the first one means we are done.
        self.exhausted = true;
        for (position, param) in self.params.iter().enumerate().rev() {
            self.indices[position] += 1;
            if self.indices[position] < param.values.len() {
                self.exhausted = false;
                break;
            }
            self.indices[position] = 0;
        }

        Some(assignment)
    }
}

/// All assignments of `params`, in cartesian-product order.
pub fn param_combinations(params: &[Param]) -> Combinations<'_> {
    Combinations::new(params)
}

/// Replaces every `{name}` in `template` with its value from `path_params`.
///
/// # Errors
///
/// Returns `MissingPathParameter` if a placeholder has no value in `path_params`.
pub fn substitute_path(template: &str, path_params: &ParamAssignment) -> Result<String> {
    let mut path = String::with_capacity(template.len());
    let mut last = 0;

    for captures in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        path.push_str(&template[last..whole.start()]);
        match captures.get(1) {
            Some(name) => {
                let value = path_params
                    .get(name.as_str())
                    .ok_or_else(|| SitemapError::MissingPathParameter {
                        name: name.as_str().to_string(),
                        path: template.to_string(),
                    })?;
                path.push_str(value);
            }
            // escaped brace
            None => path.push_str(&whole.as_str()[..1]),
        }
        last = whole.end();
    }
    path.push_str(&template[last..]);

    Ok(path)
}

/// `key=value` pairs joined by `&`, in declaration order. Empty assignments give an empty string.
///
/// Keys and values are UTF-8 percent-encoded except for alphanumerics and `_.-~`; spaces become `+`.
pub fn query_string(query_params: &ParamAssignment) -> String {
    query_params
        .iter()
        .map(|(name, value)| format!("{}={}", encode_query_component(name), encode_query_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_query_component(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_COMPONENT).to_string().replace(' ', "+")
}

/// `base_url + path`, followed by `?query` when there is a query.
pub fn build_loc(base_url: &str, path: &str, query_params: &ParamAssignment) -> String {
    let query = query_string(query_params);
    if query.is_empty() {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}{path}?{query}")
    }
}

fn build_url(
    base_url: &str,
    page: &Page,
    path: &str,
    path_params: &ParamAssignment,
    query_params: &ParamAssignment,
) -> Result<SiteMapUrl> {
    let loc = build_loc(base_url, path, query_params);
    let lastmod = page
        .lastmod
        .as_ref()
        .and_then(|field| field.resolve(path, path_params, query_params));
    let changefreq = page
        .changefreq
        .as_ref()
        .and_then(|field| field.resolve(path, path_params, query_params));
    let priority = page
        .priority
        .as_ref()
        .and_then(|field| field.resolve(path, path_params, query_params));

    Ok(SiteMapUrl::new(loc, lastmod, changefreq, priority.as_deref())?)
}

/// The URLs of a single page. Stops after the first error.
#[derive(Debug)]
pub struct PageUrls<'a> {
    base_url: &'a str,
    page: &'a Page,
    path_combinations: Combinations<'a>,
    query_combinations: Combinations<'a>,
    /// Substituted path and the path assignment it came from.
    current: Option<(String, ParamAssignment)>,
    failed: bool,
}

impl Iterator for PageUrls<'_> {
    type Item = Result<SiteMapUrl>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            if self.current.is_none() {
                let path_params = self.path_combinations.next()?;
                let path = match substitute_path(&self.page.path, &path_params) {
                    Ok(path) => path,
                    Err(error) => {
                        self.failed = true;
                        return Some(Err(error));
                    }
                };
                self.current = Some((path, path_params));
                self.query_combinations = Combinations::new(&self.page.query_params);
            }

            let Some(query_params) = self.query_combinations.next() else {
                self.current = None;
                continue;
            };
            let (path, path_params) = self.current.as_ref()?;

            let url = build_url(self.base_url, self.page, path, path_params, &query_params);
            self.failed = url.is_err();
            return Some(url);
        }
    }
}

/// Lazily expands one page against `base_url`.
pub fn expand_page<'a>(base_url: &'a str, page: &'a Page) -> PageUrls<'a> {
    PageUrls {
        base_url,
        page,
        path_combinations: Combinations::new(&page.path_params),
        query_combinations: Combinations::new(&page.query_params),
        current: None,
        failed: false,
    }
}

/// Number of URLs `page` expands into, or `None` if it does not fit in a `usize`.
pub fn page_url_count(page: &Page) -> Option<usize> {
    Combinations::new(&page.path_params)
        .total()?
        .checked_mul(Combinations::new(&page.query_params).total()?)
}

/// The URLs of every page of a site, page by page in declaration order. Stops after the first error.
#[derive(Debug)]
pub struct SiteUrls<'a> {
    base_url: &'a str,
    pages: std::slice::Iter<'a, Page>,
    current: Option<PageUrls<'a>>,
    failed: bool,
}

impl Iterator for SiteUrls<'_> {
    type Item = Result<SiteMapUrl>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            if let Some(url) = self.current.as_mut().and_then(|urls| urls.next()) {
                self.failed = url.is_err();
                return Some(url);
            }
            let page = self.pages.next()?;
            self.current = Some(expand_page(self.base_url, page));
        }
    }
}

/// Lazily expands every page of `site`.
pub fn expand_site(site: &Site) -> SiteUrls<'_> {
    SiteUrls {
        base_url: &site.base_url,
        pages: site.pages.iter(),
        current: None,
        failed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_model_smap::{ChangeFreq, InvalidPriority};

    fn assignment(pairs: &[(&str, &str)]) -> ParamAssignment {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn locs(urls: impl Iterator<Item = Result<SiteMapUrl>>) -> Vec<String> {
        urls.map(|url| url.unwrap().loc).collect()
    }

    #[test]
    fn test_combinations_first_param_varies_slowest() {
        let params = vec![Param::new("a", ["1", "2"]), Param::new("b", ["x", "y", "z"])];
        let combos: Vec<ParamAssignment> = param_combinations(&params).collect();

        assert_eq!(combos.len(), 6);
        assert_eq!(combos[0], assignment(&[("a", "1"), ("b", "x")]));
        assert_eq!(combos[1], assignment(&[("a", "1"), ("b", "y")]));
        assert_eq!(combos[2], assignment(&[("a", "1"), ("b", "z")]));
        assert_eq!(combos[3], assignment(&[("a", "2"), ("b", "x")]));
        assert_eq!(combos[5], assignment(&[("a", "2"), ("b", "z")]));
        assert_eq!(param_combinations(&params).total(), Some(6));
    }

    #[test]
    fn test_combinations_of_no_params_is_one_empty_assignment() {
        let combos: Vec<ParamAssignment> = param_combinations(&[]).collect();
        assert_eq!(combos, vec![ParamAssignment::new()]);
        assert_eq!(param_combinations(&[]).total(), Some(1));
    }

    #[test]
    fn test_combinations_drop_params_without_values() {
        let params = vec![
            Param::new("empty", Vec::<String>::new()),
            Param::new("b", ["x", "y"]),
        ];
        let combos: Vec<ParamAssignment> = param_combinations(&params).collect();

        // names stay paired with their own values
        assert_eq!(combos, vec![assignment(&[("b", "x")]), assignment(&[("b", "y")])]);

        let only_empty = vec![Param::new("empty", Vec::<String>::new())];
        let combos: Vec<ParamAssignment> = param_combinations(&only_empty).collect();
        assert_eq!(combos, vec![ParamAssignment::new()]);
    }

    #[test]
    fn test_substitute_path() {
        let params = assignment(&[("id", "42"), ("lang", "en")]);
        assert_eq!(substitute_path("/blog/{id}", &params).unwrap(), "/blog/42");
        assert_eq!(substitute_path("/{lang}/blog/{id}/", &params).unwrap(), "/en/blog/42/");
        assert_eq!(substitute_path("/static", &params).unwrap(), "/static");
        assert_eq!(substitute_path("", &ParamAssignment::new()).unwrap(), "");
        assert_eq!(substitute_path("/{{literal}}/{id}", &params).unwrap(), "/{literal}/42");
    }

    #[test]
    fn test_substitute_path_missing_parameter() {
        let err = substitute_path("/blog/{slug}", &assignment(&[("id", "1")])).unwrap_err();
        match err {
            SitemapError::MissingPathParameter { name, path } => {
                assert_eq!(name, "slug");
                assert_eq!(path, "/blog/{slug}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_query_string_keeps_declaration_order_and_encodes() {
        assert_eq!(query_string(&assignment(&[("sort", "desc"), ("page", "2")])), "sort=desc&page=2");
        assert_eq!(query_string(&assignment(&[("q", "rust & xml"), ("tag", "a/b")])), "q=rust+%26+xml&tag=a%2Fb");
        assert_eq!(query_string(&ParamAssignment::new()), "");
    }

    #[test]
    fn test_query_string_leaves_only_unreserved_characters_literal() {
        assert_eq!(query_string(&assignment(&[("q", "a*b~c")])), "q=a%2Ab~c");
        assert_eq!(query_string(&assignment(&[("x_y", "1.0-2")])), "x_y=1.0-2");
        assert_eq!(query_string(&assignment(&[("q", "a+b c")])), "q=a%2Bb+c");
        assert_eq!(query_string(&assignment(&[("city", "Zürich"), ("tag", "it's!")])), "city=Z%C3%BCrich&tag=it%27s%21");
    }

    #[test]
    fn test_combination_counts_that_overflow_are_none() {
        let values: Vec<String> = (0..1000).map(|i| i.to_string()).collect();
        let params: Vec<Param> = (0..8).map(|i| Param::new(format!("p{i}"), values.clone())).collect();
        assert_eq!(param_combinations(&params).total(), None);

        let page = Page::new("/{p0}")
            .with_path_param(Param::new("p0", values.clone()))
            .with_query_param(Param::new("a", values.clone()))
            .with_query_param(Param::new("b", values.clone()))
            .with_query_param(Param::new("c", values.clone()))
            .with_query_param(Param::new("d", values.clone()))
            .with_query_param(Param::new("e", values.clone()))
            .with_query_param(Param::new("f", values.clone()))
            .with_query_param(Param::new("g", values));
        assert_eq!(page_url_count(&page), None);
    }

    #[test]
    fn test_build_loc_omits_question_mark_without_query() {
        assert_eq!(
            build_loc("https://example.com", "/blog", &ParamAssignment::new()),
            "https://example.com/blog"
        );
        assert_eq!(
            build_loc("https://example.com", "", &assignment(&[("page", "home")])),
            "https://example.com?page=home"
        );
    }

    #[test]
    fn test_expand_page_query_params_only() {
        let page = Page::new("").with_query_param(Param::new("page", ["home", "about"]));
        assert_eq!(
            locs(expand_page("https://example.com", &page)),
            vec!["https://example.com?page=home", "https://example.com?page=about"]
        );
    }

    #[test]
    fn test_expand_page_path_params_only() {
        let page = Page::new("/blog/{id}").with_path_param(Param::new("id", ["1", "2"]));
        assert_eq!(
            locs(expand_page("https://example.com", &page)),
            vec!["https://example.com/blog/1", "https://example.com/blog/2"]
        );
    }

    #[test]
    fn test_expand_page_path_varies_slowest() {
        let page = Page::new("/{lang}/search")
            .with_path_param(Param::new("lang", ["en", "fr"]))
            .with_query_param(Param::new("q", ["a", "b"]));

        assert_eq!(
            locs(expand_page("https://example.com", &page)),
            vec![
                "https://example.com/en/search?q=a",
                "https://example.com/en/search?q=b",
                "https://example.com/fr/search?q=a",
                "https://example.com/fr/search?q=b",
            ]
        );
        assert_eq!(page_url_count(&page), Some(4));
    }

    #[test]
    fn test_expand_page_fixed_metadata() {
        let page = Page::new("/about")
            .with_lastmod("2024-01-01")
            .with_changefreq(ChangeFreq::Monthly)
            .with_priority("0.75");
        let urls: Vec<SiteMapUrl> = expand_page("https://example.com", &page).map(|u| u.unwrap()).collect();

        assert_eq!(
            urls,
            vec![SiteMapUrl::new(
                "https://example.com/about",
                Some("2024-01-01".to_string()),
                Some(ChangeFreq::Monthly),
                Some("0.8"),
            )
            .unwrap()]
        );
    }

    #[test]
    fn test_expand_page_computed_metadata_sees_path_and_assignments() {
        let page = Page::new("/blog/{id}")
            .with_path_param(Param::new("id", ["1", "2"]))
            .with_query_param(Param::new("view", ["full"]))
            .with_lastmod_fn(|path, path_params, query_params| {
                Some(format!(
                    "{path}|{}|{}",
                    path_params.get("id").unwrap_or("-"),
                    query_params.get("view").unwrap_or("-")
                ))
            })
            .with_changefreq_fn(|_, path_params, _| (path_params.get("id") == Some("1")).then_some(ChangeFreq::Daily))
            .with_priority_fn(|_, path_params, _| path_params.get("id").map(|id| format!("0.{id}")));

        let urls: Vec<SiteMapUrl> = expand_page("https://example.com", &page).map(|u| u.unwrap()).collect();

        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].loc, "https://example.com/blog/1?view=full");
        assert_eq!(urls[0].lastmod.as_deref(), Some("/blog/1|1|full"));
        assert_eq!(urls[0].changefreq, Some(ChangeFreq::Daily));
        assert_eq!(urls[0].priority.as_ref().map(|p| p.as_str()), Some("0.1"));
        assert_eq!(urls[1].lastmod.as_deref(), Some("/blog/2|2|full"));
        assert_eq!(urls[1].changefreq, None);
        assert_eq!(urls[1].priority.as_ref().map(|p| p.as_str()), Some("0.2"));
    }

    #[test]
    fn test_invalid_priority_surfaces_and_stops_iteration() {
        let site = Site::new(
            "https://example.com",
            vec![
                Page::new("/ok"),
                Page::new("/bad").with_priority("1.1"),
                Page::new("/never-reached"),
            ],
        );
        let mut urls = expand_site(&site);

        assert_eq!(urls.next().unwrap().unwrap().loc, "https://example.com/ok");
        match urls.next() {
            Some(Err(SitemapError::InvalidPriority(err))) => assert_eq!(err, InvalidPriority::new("1.1")),
            other => panic!("expected InvalidPriority, got {other:?}"),
        }
        assert!(urls.next().is_none());
    }

    #[test]
    fn test_missing_path_parameter_surfaces_from_iteration() {
        let page = Page::new("/blog/{id}");
        let mut urls = expand_page("https://example.com", &page);
        assert!(matches!(
            urls.next(),
            Some(Err(SitemapError::MissingPathParameter { .. }))
        ));
        assert!(urls.next().is_none());
    }

    #[test]
    fn test_expand_site_in_page_order() {
        let site = Site::new(
            "https://example.com",
            vec![
                Page::new("/b").with_query_param(Param::new("x", ["1"])),
                Page::new("/a"),
            ],
        );
        assert_eq!(
            locs(expand_site(&site)),
            vec!["https://example.com/b?x=1", "https://example.com/a"]
        );
        assert_eq!(expand_site(&Site::new("https://example.com", vec![])).count(), 0);
    }
}
