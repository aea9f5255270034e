//! One-shot message exchange with the backend.
//!
//! Each submitted message becomes exactly one POST to the backend
//! endpoint; the reply (or a fixed fallback) comes back as a typed
//! event. There is no retry, no timeout, and no request cancellation.

pub mod pipeline;
pub mod protocol;

pub use pipeline::{ExchangeCommand, ExchangeConfig, ExchangeEvent, ExchangePipeline};
pub use protocol::{ChatReply, ChatRequest, FALLBACK_EMPTY_REPLY, FALLBACK_UNREACHABLE};
