//! academy-client library
//!
//! Typed access to the academy-portal API plus the polling chat view.

pub mod chat_poller;
pub mod client;
pub mod error;

pub use chat_poller::{ChatPoller, ChatTransport, ChatView};
pub use client::PortalClient;
pub use error::{ClientError, Result};
