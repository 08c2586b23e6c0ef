//! Tests for URL expansion through the public API
//!
//! Covers:
//! - The mixed query/path parameter site fixture and its exact URL order
//! - Determinism across repeated generation
//! - URL counts as the product of path and query combinations
//! - Loading a site description from JSON

use core_smap::{ChangeFreq, Page, Param, Site, SiteMapUrl, SitemapGenerator, parse_site};

fn fixture_site() -> Site {
    Site::new(
        "https://example.com",
        vec![
            Page::new("")
                .with_query_param(Param::new("page", ["home", "about", "contact"]))
                .with_query_param(Param::new("sort", ["asc", "desc"])),
            Page::new("/blog")
                .with_query_param(Param::new("page", ["1", "2", "3"]))
                .with_query_param(Param::new("sort", ["asc", "desc"])),
            Page::new("/blog/{id}").with_path_param(Param::new("id", ["1", "2", "3"])),
        ],
    )
}

#[test]
fn test_fixture_site_generates_expected_urls_in_order() {
    let urls = SitemapGenerator::new(fixture_site()).generate().unwrap();

    let expected: Vec<SiteMapUrl> = [
        "https://example.com?page=home&sort=asc",
        "https://example.com?page=home&sort=desc",
        "https://example.com?page=about&sort=asc",
        "https://example.com?page=about&sort=desc",
        "https://example.com?page=contact&sort=asc",
        "https://example.com?page=contact&sort=desc",
        "https://example.com/blog?page=1&sort=asc",
        "https://example.com/blog?page=1&sort=desc",
        "https://example.com/blog?page=2&sort=asc",
        "https://example.com/blog?page=2&sort=desc",
        "https://example.com/blog?page=3&sort=asc",
        "https://example.com/blog?page=3&sort=desc",
        "https://example.com/blog/1",
        "https://example.com/blog/2",
        "https://example.com/blog/3",
    ]
    .into_iter()
    .map(SiteMapUrl::from_loc)
    .collect();

    assert_eq!(urls, expected);
}

#[test]
fn test_generation_is_deterministic() {
    let generator = SitemapGenerator::new(fixture_site());
    let first: Vec<String> = generator.iter_urls().map(|u| u.unwrap().loc).collect();
    let second: Vec<String> = generator.iter_urls().map(|u| u.unwrap().loc).collect();
    assert_eq!(first, second);
}

#[test]
fn test_url_count_is_product_of_path_and_query_combinations() {
    for (path_values, query_a, query_b) in [(1, 1, 1), (2, 3, 1), (3, 2, 4), (5, 1, 2)] {
        let values = |prefix: &str, n: usize| (0..n).map(|i| format!("{prefix}{i}")).collect::<Vec<_>>();
        let page = Page::new("/{section}")
            .with_path_param(Param::new("section", values("s", path_values)))
            .with_query_param(Param::new("a", values("a", query_a)))
            .with_query_param(Param::new("b", values("b", query_b)));
        let generator = SitemapGenerator::new(Site::new("https://example.com", vec![page]));

        let expected = path_values * query_a * query_b;
        assert_eq!(generator.generate().unwrap().len(), expected);
        assert_eq!(generator.url_count(), Some(expected));
    }
}

#[test]
fn test_empty_valued_parameters_are_ignored() {
    let page = Page::new("/search")
        .with_query_param(Param::new("filter", Vec::<String>::new()))
        .with_query_param(Param::new("q", ["rust"]));
    let urls = SitemapGenerator::new(Site::new("https://example.com", vec![page]))
        .generate()
        .unwrap();
    assert_eq!(urls, vec![SiteMapUrl::from_loc("https://example.com/search?q=rust")]);
}

#[test]
fn test_site_from_json_description() {
    let site = parse_site(
        r#"{
            "base_url": "https://example.com",
            "pages": [
                {
                    "path": "/docs/{topic}",
                    "path_params": [{"name": "topic", "values": ["install", "usage"]}],
                    "lastmod": "2024-06-01",
                    "changefreq": "monthly",
                    "priority": "0.6"
                }
            ]
        }"#,
    )
    .unwrap();

    let urls = SitemapGenerator::new(site).generate().unwrap();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[1].loc, "https://example.com/docs/usage");
    assert_eq!(urls[1].lastmod.as_deref(), Some("2024-06-01"));
    assert_eq!(urls[1].changefreq, Some(ChangeFreq::Monthly));
    assert_eq!(urls[1].priority.as_ref().map(|p| p.as_str()), Some("0.6"));
}
