use once_cell::sync::Lazy;
use regex::Regex;

use crate::fragment::FragmentNode;

/// Bare `http://` / `https://` runs, terminated before whitespace and
/// quote/bracket characters. Anchored to those two schemes so nothing like
/// `javascript:` can ever become a link.
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"'<>\[\]{}()`]+"#).unwrap());

/// Split free-form text into text and link nodes.
///
/// Empty input yields exactly one empty text node, never an empty list.
pub fn linkify(text: &str) -> Vec<FragmentNode> {
    if text.is_empty() {
        return vec![FragmentNode::text("")];
    }

    let mut nodes = Vec::new();
    let mut cursor = 0;

    for found in URL_PATTERN.find_iter(text) {
        if found.start() > cursor {
            nodes.push(FragmentNode::text(&text[cursor..found.start()]));
        }
        nodes.push(FragmentNode::link(found.as_str()));
        cursor = found.end();
    }

    if cursor < text.len() {
        nodes.push(FragmentNode::text(&text[cursor..]));
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_in_running_text_splits_into_three_nodes() {
        let nodes = linkify("visit https://example.com/x?y=1 now");
        assert_eq!(
            nodes,
            vec![
                FragmentNode::text("visit "),
                FragmentNode::link("https://example.com/x?y=1"),
                FragmentNode::text(" now"),
            ]
        );
    }

    #[test]
    fn test_javascript_scheme_is_never_linkified() {
        let nodes = linkify("click javascript:alert(1) if you dare");
        assert!(nodes
            .iter()
            .all(|node| matches!(node, FragmentNode::Text { .. })));
    }

    #[test]
    fn test_other_schemes_stay_plain_text() {
        for text in [
            "ftp://files.example.com/readme",
            "mailto:support@example.com",
            "data:text/html;base64,PHNjcmlwdD4=",
        ] {
            let nodes = linkify(text);
            assert_eq!(nodes, vec![FragmentNode::text(text)]);
        }
    }

    #[test]
    fn test_plain_http_is_linkified() {
        let nodes = linkify("http://example.com");
        assert_eq!(nodes, vec![FragmentNode::link("http://example.com")]);
    }

    #[test]
    fn test_quotes_and_brackets_terminate_urls() {
        let nodes = linkify(r#"see "https://example.com/a" and (https://example.com/b)"#);
        let links: Vec<&str> = nodes
            .iter()
            .filter_map(|node| match node {
                FragmentNode::Link { href } => Some(href.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(links, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[test]
    fn test_multiple_urls_keep_order() {
        let nodes = linkify("https://a.example https://b.example");
        assert_eq!(
            nodes,
            vec![
                FragmentNode::link("https://a.example"),
                FragmentNode::text(" "),
                FragmentNode::link("https://b.example"),
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_single_empty_text_node() {
        assert_eq!(linkify(""), vec![FragmentNode::text("")]);
    }

    #[test]
    fn test_text_without_urls_is_one_node() {
        assert_eq!(
            linkify("no links here"),
            vec![FragmentNode::text("no links here")]
        );
    }
}
