// src/feed/target.rs
use std::sync::{Arc, RwLock};

use crate::render::Accent;

/// Output sink for one host document: two replaceable regions plus the
/// timeline accent. Every write replaces, never appends.
pub trait RenderTarget: Send + Sync {
    fn replace_timeline(&self, html: String);
    fn replace_trending(&self, html: String);
    fn set_accent(&self, accent: Accent);
}

/// Current content of the two regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub timeline: String,
    pub trending: String,
    /// `None` until the first successful render sets it.
    pub accent: Option<Accent>,
}

/// In-memory document shared between the scheduler and the HTTP adapter.
#[derive(Debug, Clone, Default)]
pub struct SharedDocument {
    inner: Arc<RwLock<DocumentSnapshot>>,
}

impl SharedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with pre-existing region content.
    pub fn with_content(timeline: impl Into<String>, trending: impl Into<String>) -> Self {
        let doc = Self::default();
        doc.write(|d| {
            d.timeline = timeline.into();
            d.trending = trending.into();
        });
        doc
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        match self.inner.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn write(&self, f: impl FnOnce(&mut DocumentSnapshot)) {
        let mut g = self.inner.write().unwrap_or_else(|p| p.into_inner());
        f(&mut g);
    }
}

impl RenderTarget for SharedDocument {
    fn replace_timeline(&self, html: String) {
        self.write(|d| d.timeline = html);
    }

    fn replace_trending(&self, html: String) {
        self.write(|d| d.trending = html);
    }

    fn set_accent(&self, accent: Accent) {
        self.write(|d| d.accent = Some(accent));
    }
}
