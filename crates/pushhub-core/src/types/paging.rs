//! Skip/take paging for store queries.

use serde::{Deserialize, Serialize};

/// Offset-based paging window for subscription and request queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Paging {
    /// Number of items to skip.
    pub skip: usize,
    /// Maximum number of items to return.
    pub take: usize,
}

impl Paging {
    /// Create a new paging window.
    pub fn new(skip: usize, take: usize) -> Self {
        Self { skip, take }
    }

    /// A window covering every item.
    pub fn all() -> Self {
        Self {
            skip: 0,
            take: usize::MAX,
        }
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self::all()
    }
}
