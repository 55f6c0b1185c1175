use async_trait::async_trait;
pub use shopwright_common::error::PageError;
use shopwright_common::{Locator, PageSnapshot};
use std::fmt;

/// Handle to an element the page has located. Only meaningful to the page
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(pub u32);

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The single action performed on a resolved target.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Click,
    /// Clear the field, then type.
    Type(String),
    /// Pick the option at this index of a `<select>`.
    Select(usize),
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interaction::Click => f.write_str("click"),
            Interaction::Type(_) => f.write_str("type"),
            Interaction::Select(index) => write!(f, "select option {}", index),
        }
    }
}

/// Capabilities the resolution core needs from a live page. The caller owns
/// the browser session; the core never launches or navigates.
#[async_trait]
pub trait Page: Send {
    /// Locate the first element described by `locator`, optionally restricted
    /// to the subtree of `within`. A point locator yields the element at that
    /// point. `Ok(None)` means nothing matched yet.
    async fn find(
        &mut self,
        locator: &Locator,
        within: Option<ElementRef>,
    ) -> Result<Option<ElementRef>, PageError>;

    /// All elements matching a CSS selector, in document order.
    async fn find_all(
        &mut self,
        selector: &str,
        within: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>, PageError>;

    async fn is_visible(&mut self, element: ElementRef) -> Result<bool, PageError>;

    async fn is_enabled(&mut self, element: ElementRef) -> Result<bool, PageError>;

    async fn scroll_into_view(&mut self, _element: ElementRef) -> Result<(), PageError> {
        Ok(())
    }

    async fn click(&mut self, element: ElementRef) -> Result<(), PageError>;

    /// Click at a viewport coordinate.
    async fn click_at(&mut self, x: f64, y: f64) -> Result<(), PageError>;

    /// Replace the field's value with `text`.
    async fn type_text(&mut self, element: ElementRef, text: &str) -> Result<(), PageError>;

    async fn select_option(&mut self, _element: ElementRef, _index: usize) -> Result<(), PageError> {
        Err(PageError::NotSupported("select_option".into()))
    }

    /// Visible text of an element and its subtree.
    async fn inner_text(&mut self, element: ElementRef) -> Result<String, PageError>;

    /// Buttons and links inside an element, in document order.
    async fn controls(&mut self, element: ElementRef) -> Result<Vec<ElementRef>, PageError> {
        self.find_all("button, a", Some(element)).await
    }

    /// Unbounded snapshot of the page for the hint service.
    async fn snapshot(&mut self) -> Result<PageSnapshot, PageError> {
        Err(PageError::NotSupported("snapshot".into()))
    }
}
