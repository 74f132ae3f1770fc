use crate::filter::LinkFilter;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Returns the href of every anchor in the document, `None` where the attribute is absent
pub fn anchor_hrefs(html: &str) -> Vec<Option<String>> {
    let doc = Html::parse_document(html);

    let link_selector = Selector::parse("a").expect("static selector");
    doc.select(&link_selector)
        .map(|e| e.value().attr("href").map(|s| s.to_string()))
        .collect()
}

/// Cuts an href at its first query-string delimiter
pub fn strip_query(href: &str) -> &str {
    match href.find('?') {
        Some(idx) => &href[..idx],
        None => href,
    }
}

/// Keeps hrefs accepted by the filter, strips their query strings and drops duplicates.
///
/// Absent hrefs are skipped. The result keeps the order in which each link was first seen.
pub fn collect_links<'a, I>(hrefs: I, filter: &LinkFilter) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in hrefs.into_iter().flatten() {
        if !filter.accepts(href) {
            continue;
        }
        let link = strip_query(href);
        if seen.insert(link.to_string()) {
            links.push(link.to_string());
        }
    }

    links
}

/// Extracts reel links from rendered page source.
///
/// Relative hrefs are resolved against `page_url`, the way a browser reports the `href`
/// property of an anchor.
pub fn links_from_html(html: &str, page_url: &str, filter: &LinkFilter) -> Vec<String> {
    let base = Url::parse(page_url).ok();

    let resolved: Vec<Option<String>> = anchor_hrefs(html)
        .into_iter()
        .map(|href| href.map(|h| resolve(base.as_ref(), &h)))
        .collect();

    let links = collect_links(resolved.iter().map(|h| h.as_deref()), filter);

    ::log::debug!("Found {} matching links on {}", links.len(), page_url);
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    links
}

fn resolve(base: Option<&Url>, href: &str) -> String {
    match base.map(|b| b.join(href)) {
        Some(Ok(url)) => url.to_string(),
        _ => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reel_filter() -> LinkFilter {
        LinkFilter::marker("/reel/")
    }

    #[test]
    fn test_query_variants_collapse() {
        let hrefs = [
            Some("https://x.com/reel/1?x=1"),
            Some("https://x.com/reel/1?x=2"),
            Some("https://x.com/reel/2"),
            None,
        ];
        let links: HashSet<String> = collect_links(hrefs, &reel_filter()).into_iter().collect();

        let expected: HashSet<String> = ["https://x.com/reel/1", "https://x.com/reel/2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(links, expected);
    }

    #[test]
    fn test_absent_hrefs_skipped() {
        let links = collect_links([None, None, Some("https://x.com/reel/9")], &reel_filter());
        assert_eq!(links, vec!["https://x.com/reel/9".to_string()]);
    }

    #[test]
    fn test_no_anchors_gives_empty_list() {
        assert!(collect_links(std::iter::empty(), &reel_filter()).is_empty());
        assert!(links_from_html("<html><body></body></html>", "https://x.com/", &reel_filter())
            .is_empty());
    }

    #[test]
    fn test_first_seen_order() {
        let hrefs = [
            Some("https://x.com/reel/3"),
            Some("https://x.com/reel/1?a=b"),
            Some("https://x.com/reel/3?again"),
        ];
        let links = collect_links(hrefs, &reel_filter());
        assert_eq!(links, vec!["https://x.com/reel/3", "https://x.com/reel/1"]);
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("https://x.com/reel/1?x=1?y=2"), "https://x.com/reel/1");
        assert_eq!(strip_query("https://x.com/reel/1"), "https://x.com/reel/1");
    }

    #[test]
    fn test_links_from_html() {
        let html = r#"<html><body>
            <a href="https://x.com/reel/1?s=1">one</a>
            <a href="/reel/2?s=2">two</a>
            <a href="/reel/1">one again</a>
            <a>no href</a>
            <a href="/videos/3">not a reel</a>
        </body></html>"#;

        let links = links_from_html(html, "https://x.com/page/reels/", &reel_filter());
        assert_eq!(links, vec!["https://x.com/reel/1", "https://x.com/reel/2"]);
    }

    #[test]
    fn test_anchor_hrefs_keeps_absent() {
        let hrefs = anchor_hrefs(r#"<a href="/a">a</a><a>b</a>"#);
        assert_eq!(hrefs, vec![Some("/a".to_string()), None]);
    }
}
