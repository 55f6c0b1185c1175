use crate::cdp::{CdpClient, DriverError};
use crate::script;
use async_trait::async_trait;
use chromiumoxide::layout::Point;
use serde::Deserialize;
use serde_json::{Value, json};
use shopwright_common::{Locator, PageError, PageSnapshot};
use shopwright_engine::{ElementRef, Page};
use tracing::info;

/// A Chromium tab driven over CDP.
pub struct ChromiumPage {
    client: Option<CdpClient>,
    visible: bool,
}

#[derive(Debug, Deserialize)]
struct Center {
    x: f64,
    y: f64,
}

impl ChromiumPage {
    pub fn new() -> Self {
        Self::new_with_visibility(false)
    }

    pub fn new_with_visibility(visible: bool) -> Self {
        Self {
            client: None,
            visible,
        }
    }

    pub async fn launch(&mut self) -> Result<(), DriverError> {
        info!("launching Chromium");
        self.client = Some(CdpClient::launch(self.visible).await?);
        Ok(())
    }

    pub async fn close(&mut self) -> Result<(), DriverError> {
        if let Some(client) = self.client.take() {
            client.close().await?;
        }
        Ok(())
    }

    /// Navigate and wait for the load event. Returns the final URL.
    pub async fn goto(&mut self, url: &str) -> Result<String, PageError> {
        let page = self.tab()?;
        info!(url, "navigating");
        page.goto(url)
            .await
            .map_err(|e| PageError::Navigation(e.to_string()))?;
        let current = page
            .url()
            .await
            .map_err(|e| PageError::Navigation(e.to_string()))?;
        Ok(current.unwrap_or_else(|| url.to_string()))
    }

    pub async fn title(&mut self) -> Result<String, PageError> {
        let page = self.tab()?;
        Ok(page
            .get_title()
            .await
            .map_err(|e| PageError::Other(e.to_string()))?
            .unwrap_or_default())
    }

    fn tab(&self) -> Result<&chromiumoxide::Page, PageError> {
        self.client
            .as_ref()
            .map(|c| &c.page)
            .ok_or(PageError::NotReady)
    }

    async fn probe(&self, request: Value) -> Result<Value, PageError> {
        script::call(self.tab()?, request).await
    }

    async fn probe_element(&self, action: &str, element: ElementRef) -> Result<Value, PageError> {
        self.probe(json!({"action": action, "id": element.0})).await
    }

    async fn mouse_click(&self, x: f64, y: f64) -> Result<(), PageError> {
        self.tab()?
            .click(Point::new(x, y))
            .await
            .map_err(|e| PageError::Other(format!("click at ({}, {}) failed: {}", x, y, e)))?;
        Ok(())
    }
}

impl Default for ChromiumPage {
    fn default() -> Self {
        Self::new()
    }
}

fn element_ref(value: Value) -> Result<Option<ElementRef>, PageError> {
    Ok(serde_json::from_value::<Option<u32>>(value)?.map(ElementRef))
}

#[async_trait]
impl Page for ChromiumPage {
    async fn find(
        &mut self,
        locator: &Locator,
        within: Option<ElementRef>,
    ) -> Result<Option<ElementRef>, PageError> {
        let value = self
            .probe(json!({
                "action": "find",
                "locator": locator,
                "scope": within.map(|el| el.0),
            }))
            .await?;
        element_ref(value)
    }

    async fn find_all(
        &mut self,
        selector: &str,
        within: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>, PageError> {
        let value = self
            .probe(json!({
                "action": "find_all",
                "selector": selector,
                "scope": within.map(|el| el.0),
            }))
            .await?;
        let ids: Vec<u32> = serde_json::from_value(value)?;
        Ok(ids.into_iter().map(ElementRef).collect())
    }

    async fn is_visible(&mut self, element: ElementRef) -> Result<bool, PageError> {
        Ok(serde_json::from_value(self.probe_element("visible", element).await?)?)
    }

    async fn is_enabled(&mut self, element: ElementRef) -> Result<bool, PageError> {
        Ok(serde_json::from_value(self.probe_element("enabled", element).await?)?)
    }

    async fn scroll_into_view(&mut self, element: ElementRef) -> Result<(), PageError> {
        self.probe_element("scroll", element).await?;
        Ok(())
    }

    async fn click(&mut self, element: ElementRef) -> Result<(), PageError> {
        self.probe_element("scroll", element).await?;
        let center: Center = serde_json::from_value(self.probe_element("center", element).await?)?;
        self.mouse_click(center.x, center.y).await
    }

    async fn click_at(&mut self, x: f64, y: f64) -> Result<(), PageError> {
        self.mouse_click(x, y).await
    }

    async fn type_text(&mut self, element: ElementRef, text: &str) -> Result<(), PageError> {
        self.probe(json!({"action": "fill", "id": element.0, "text": text}))
            .await?;
        Ok(())
    }

    async fn select_option(&mut self, element: ElementRef, index: usize) -> Result<(), PageError> {
        self.probe(json!({"action": "select", "id": element.0, "index": index}))
            .await?;
        Ok(())
    }

    async fn inner_text(&mut self, element: ElementRef) -> Result<String, PageError> {
        Ok(serde_json::from_value(self.probe_element("text", element).await?)?)
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, PageError> {
        Ok(serde_json::from_value(
            self.probe(json!({"action": "snapshot"})).await?,
        )?)
    }
}
