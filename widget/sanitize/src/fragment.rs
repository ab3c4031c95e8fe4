use serde::{Deserialize, Serialize};

/// One node of a rendered message fragment.
///
/// Text spans become DOM text nodes; links become anchors with
/// `rel="noopener noreferrer"` and `target="_blank"`. Nothing here is ever
/// rendered through HTML-string assignment, so message text cannot smuggle
/// markup in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FragmentNode {
    Text { text: String },
    Link { href: String },
}

impl FragmentNode {
    pub fn text(text: impl Into<String>) -> Self {
        FragmentNode::Text { text: text.into() }
    }

    pub fn link(href: impl Into<String>) -> Self {
        FragmentNode::Link { href: href.into() }
    }

    /// Accessible label for anchors; screen readers hear the destination.
    pub fn accessible_label(href: &str) -> String {
        format!("{href} (opens in a new tab)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessible_label_carries_url() {
        let label = FragmentNode::accessible_label("https://example.com/pricing");
        assert!(label.contains("https://example.com/pricing"));
    }
}
