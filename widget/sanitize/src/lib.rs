//! Message sanitization and auto-linking.
//!
//! Converts free-form chat text into a typed fragment list a render
//! surface can materialize without ever assigning HTML strings.

pub mod fragment;
pub mod linkify;
pub mod renderer;

pub use fragment::FragmentNode;
pub use linkify::linkify;
pub use renderer::to_plain_text;
