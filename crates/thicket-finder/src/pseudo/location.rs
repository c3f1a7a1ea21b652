//! [§ 7 Location Pseudo-classes](https://www.w3.org/TR/selectors-4/#location)

use crate::context::MatchContext;
use crate::tree::Tree;
use crate::walk;

impl<T: Tree + ?Sized> MatchContext<'_, T> {
    /// [§ 7.2 The Hyperlink Pseudo-class: `:any-link`](https://www.w3.org/TR/selectors-4/#the-any-link-pseudo)
    ///
    /// [HTML § 4.16.3](https://html.spec.whatwg.org/multipage/semantics-other.html#selector-link)
    /// "All a elements that have an href attribute, and all area elements that
    /// have an href attribute". Visited state is never exposed, so `:link`
    /// matches the same set.
    pub(super) fn is_link(&self, node: T::Node) -> bool {
        (self.is_html(node, "a") || self.is_html(node, "area"))
            && self.tree.attribute(node, "href").is_some()
    }

    /// [§ 7.3 The Local Link Pseudo-class: `:local-link`](https://www.w3.org/TR/selectors-4/#the-local-link-pseudo)
    ///
    /// "represents an element that is the source anchor of a hyperlink whose
    /// target's absolute URL matches the element's own document URL", ignoring
    /// fragments.
    pub(super) fn match_local_link(&self, node: T::Node) -> bool {
        if !self.is_link(node) {
            return false;
        }
        let Some(href) = self.tree.attribute(node, "href") else {
            return false;
        };
        let Some(document_url) = self.tree.document_url(node) else {
            return false;
        };
        resolve_url(document_url, href.trim())
            .is_some_and(|target| strip_fragment(&target) == strip_fragment(document_url))
    }

    /// [§ 7.6 The Target-container Pseudo-class: `:target-within`](https://www.w3.org/TR/selectors-4/#the-target-within-pseudo)
    pub(super) fn match_target_within(&self, node: T::Node) -> bool {
        self.tree.target_element(node).is_some_and(|target| {
            target == node || walk::flat_element_ancestors(self.tree, target).any(|a| a == node)
        })
    }
}

fn strip_fragment(url: &str) -> &str {
    url.split_once('#').map_or(url, |(before, _)| before)
}

fn has_scheme(url: &str) -> bool {
    url.split_once(':').is_some_and(|(scheme, _)| {
        scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Resolve `href` against `base` for the forms links commonly take: absolute,
/// scheme-relative, path-absolute, fragment-only, query-only and
/// path-relative.
fn resolve_url(base: &str, href: &str) -> Option<String> {
    if has_scheme(href) {
        return Some(href.to_string());
    }
    let (scheme, rest) = base.split_once("://")?;
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let (authority, path) = rest.split_at(authority_end);

    if let Some(scheme_relative) = href.strip_prefix("//") {
        return Some(format!("{scheme}://{scheme_relative}"));
    }
    if href.is_empty() || href.starts_with('#') {
        return Some(format!("{}{href}", strip_fragment(base)));
    }
    let path = strip_fragment(path);
    let path_without_query = path.split_once('?').map_or(path, |(before, _)| before);
    if href.starts_with('?') {
        return Some(format!("{scheme}://{authority}{path_without_query}{href}"));
    }
    if href.starts_with('/') {
        return Some(format!("{scheme}://{authority}{}", normalize_path(href)));
    }
    let directory = path_without_query
        .rfind('/')
        .map_or("/", |slash| &path_without_query[..=slash]);
    Some(format!(
        "{scheme}://{authority}{}",
        normalize_path(&format!("{directory}{href}"))
    ))
}

/// Remove `.` and `..` segments from an absolute path.
fn normalize_path(path: &str) -> String {
    let (path, suffix) = match path.find(['?', '#']) {
        Some(index) => path.split_at(index),
        None => (path, ""),
    };
    let mut segments: Vec<&str> = Vec::new();
    let trailing_slash = path.ends_with('/') || path.ends_with("/.") || path.ends_with("/..");
    for segment in path.split('/').skip(1) {
        match segment {
            "." => {}
            ".." => {
                let _ = segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    let mut normalized = String::new();
    for segment in &segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() || (trailing_slash && !normalized.ends_with('/')) {
        normalized.push('/');
    }
    normalized.push_str(suffix);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/docs/page.html?x=1#top";

    #[test]
    fn test_resolve_fragment_only() {
        assert_eq!(
            resolve_url(BASE, "#intro").as_deref(),
            Some("https://example.com/docs/page.html?x=1#intro")
        );
    }

    #[test]
    fn test_resolve_relative_path() {
        assert_eq!(
            resolve_url(BASE, "../index.html").as_deref(),
            Some("https://example.com/index.html")
        );
        assert_eq!(
            resolve_url(BASE, "page.html?x=1").as_deref(),
            Some("https://example.com/docs/page.html?x=1")
        );
    }

    #[test]
    fn test_resolve_absolute_forms() {
        assert_eq!(
            resolve_url(BASE, "/docs/page.html").as_deref(),
            Some("https://example.com/docs/page.html")
        );
        assert_eq!(
            resolve_url(BASE, "//other.org/a").as_deref(),
            Some("https://other.org/a")
        );
        assert_eq!(
            resolve_url(BASE, "mailto:someone@example.com").as_deref(),
            Some("mailto:someone@example.com")
        );
    }
}
