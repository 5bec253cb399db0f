// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod article;
pub mod classify;
pub mod config;
pub mod feed;
pub mod format;
pub mod metrics;
pub mod render;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::article::{Article, Envelope, TagsField};
pub use crate::classify::{classify, Lanes};
pub use crate::feed::{
    source::{ArticleSource, HttpArticleSource},
    target::{RenderTarget, SharedDocument},
    CycleOutcome, FeedScheduler, FeedState, StalePolicy,
};
pub use crate::render::{Accent, RenderedPanes};
