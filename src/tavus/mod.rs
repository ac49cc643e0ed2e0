//! Minimal client for the Tavus conversational video API.
//!
//! Only conversation creation is covered; the server calls it once per
//! `POST /start`.

mod client;
mod error;

pub use client::{
    CreateConversationRequest, CreateConversationResult, RetrievalStrategy, TavusClient,
};
pub use error::{Result, TavusError};
