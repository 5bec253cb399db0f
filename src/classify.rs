// src/classify.rs
use crate::article::Article;

/// One batch split into its two display lanes, input order preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lanes {
    /// Articles carrying a non-empty legend.
    pub timeline: Vec<Article>,
    /// Everything else.
    pub trending: Vec<Article>,
}

/// Stable partition by legend presence. Missing and empty legends both go to
/// trending.
pub fn classify(batch: Vec<Article>) -> Lanes {
    let (timeline, trending) = batch.into_iter().partition(|a| a.legend().is_some());
    Lanes { timeline, trending }
}
