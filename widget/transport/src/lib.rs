//! Chat transport.
//!
//! `ChatBackend` is the seam the controller talks to; `HttpChatClient` is
//! the production implementation addressing the platform's widget chat
//! endpoint.

pub mod chat;

pub use chat::{ChatAnswer, ChatBackend, HttpChatClient, CHAT_ENDPOINT_PATH, DEFAULT_API_BASE_URL};
