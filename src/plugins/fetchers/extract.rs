use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::config::ScraperConfig;
use crate::models::Observation;
use crate::utils::error::AppError;

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").expect("static regex"));

/// Parsed CSS selectors locating the price and title on a listing page.
#[derive(Debug, Clone)]
pub struct PageSelectors {
    price: Selector,
    title: Selector,
    price_source: String,
    title_source: String,
}

impl PageSelectors {
    pub fn new(price: &str, title: &str) -> Result<Self, AppError> {
        Ok(Self {
            price: parse_selector(price)?,
            title: parse_selector(title)?,
            price_source: price.to_string(),
            title_source: title.to_string(),
        })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, AppError> {
        Self::new(&config.price_selector, &config.title_selector)
    }

    pub fn price_selector(&self) -> &str {
        &self.price_source
    }

    /// Reads the observation out of a fully rendered page.
    pub fn extract(&self, url: &str, html: &str) -> Result<Observation, AppError> {
        let document = Html::parse_document(html);

        let price_text = first_text(&document, &self.price)
            .ok_or_else(|| AppError::fetch(url, format!("price element '{}' not found", self.price_source)))?;
        let title = first_text(&document, &self.title)
            .ok_or_else(|| AppError::fetch(url, format!("title element '{}' not found", self.title_source)))?;

        let price = parse_price(&price_text)
            .ok_or_else(|| AppError::fetch(url, format!("could not read a price from '{}'", price_text.trim())))?;

        Ok(Observation::new(price, title.trim()))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, AppError> {
    Selector::parse(selector)
        .map_err(|e| AppError::Validation(format!("Invalid CSS selector '{}': {:?}", selector, e)))
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|element| element.text().collect::<Vec<_>>().join(""))
}

/// Keeps only the digits of a displayed price, so `"￥1,980"` reads as `1980`.
pub fn parse_price(text: &str) -> Option<i64> {
    let digits = NON_DIGITS.replace_all(text, "");
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html>
            <body>
                <span id="productTitle">
                    Widget Deluxe, Blue
                </span>
                <div class="a-price">
                    <span class="a-price-symbol">￥</span>
                    <span class="a-price-whole">1,980</span>
                </div>
                <span class="a-price-whole">9,999</span>
            </body>
        </html>
    "#;

    fn selectors() -> PageSelectors {
        PageSelectors::new("span.a-price-whole", "#productTitle").unwrap()
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("1,980"), Some(1980));
        assert_eq!(parse_price("￥ 12,345"), Some(12345));
        assert_eq!(parse_price("$19."), Some(19));
        assert_eq!(parse_price("0"), Some(0));
        assert_eq!(parse_price("out of stock"), None);
        assert_eq!(parse_price(""), None);
        // More digits than fit in an i64
        assert_eq!(parse_price("99999999999999999999999"), None);
    }

    #[test]
    fn test_extract_observation() {
        let observation = selectors().extract("https://example.com/w", LISTING).unwrap();
        assert_eq!(observation.price, 1980);
        assert_eq!(observation.title, "Widget Deluxe, Blue");
    }

    #[test]
    fn test_extract_missing_price() {
        let html = r#"<html><body><span id="productTitle">Widget</span></body></html>"#;
        let err = selectors().extract("https://example.com/w", html).unwrap_err();
        assert!(matches!(err, AppError::Fetch { .. }));
        assert!(err.to_string().contains("price element 'span.a-price-whole' not found"));
    }

    #[test]
    fn test_extract_missing_title() {
        let html = r#"<html><body><span class="a-price-whole">100</span></body></html>"#;
        let err = selectors().extract("https://example.com/w", html).unwrap_err();
        assert!(err.to_string().contains("title element '#productTitle' not found"));
    }

    #[test]
    fn test_extract_unreadable_price() {
        let html = r#"
            <span id="productTitle">Widget</span>
            <span class="a-price-whole">Currently unavailable</span>
        "#;
        let err = selectors().extract("https://example.com/w", html).unwrap_err();
        assert!(err.to_string().contains("could not read a price"));
    }

    #[test]
    fn test_empty_title_is_passed_through() {
        // Rejecting blank titles is the reconciler's job
        let html = r#"
            <span id="productTitle">   </span>
            <span class="a-price-whole">100</span>
        "#;
        let observation = selectors().extract("https://example.com/w", html).unwrap();
        assert_eq!(observation.title, "");
    }

    #[test]
    fn test_invalid_selector() {
        let result = PageSelectors::new(">>>", "#productTitle");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
