// Page fetcher implementations
pub mod extract;
pub mod http;
pub mod browser;
pub mod retry;

pub use extract::PageSelectors;
pub use http::HttpFetcher;
pub use browser::BrowserFetcher;
pub use retry::RetryingFetcher;
