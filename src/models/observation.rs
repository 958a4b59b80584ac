use serde::{Deserialize, Serialize};

/// A freshly fetched `(price, title)` pair for one listing.
///
/// The price is signed so that a bad value coming out of a fetcher reaches the
/// reconciler and gets rejected there instead of wrapping silently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Observation {
    pub price: i64,
    pub title: String,
}

impl Observation {
    pub fn new(price: i64, title: impl Into<String>) -> Self {
        Self {
            price,
            title: title.into(),
        }
    }
}
