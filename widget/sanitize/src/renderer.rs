use crate::fragment::FragmentNode;

/// Flatten a fragment list back to plain text.
///
/// Used by the headless surface and the terminal harness, where there is
/// no anchor element to build.
pub fn to_plain_text(nodes: &[FragmentNode]) -> String {
    let mut output = String::new();
    for node in nodes {
        match node {
            FragmentNode::Text { text } => output.push_str(text),
            FragmentNode::Link { href } => output.push_str(href),
        }
    }
    output
}
