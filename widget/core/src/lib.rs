pub mod config;
pub mod environment;
pub mod error;
pub mod geometry;
pub mod session;
pub mod state;

pub use config::{Anchor, WidgetConfig};
pub use environment::EnvironmentLabel;
pub use error::WidgetError;
pub use geometry::{Point, Size, Viewport};
pub use session::SessionId;
pub use state::{ChatMessage, MessageRole, WidgetState};
