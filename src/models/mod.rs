pub mod observation;
pub mod tracked_item;

// Re-exports for convenience
pub use observation::*;
pub use tracked_item::*;
