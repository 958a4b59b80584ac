pub mod fetcher;
pub mod notifier;

pub use fetcher::PageFetcher;
pub use notifier::Notifier;
