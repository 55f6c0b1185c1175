#![allow(dead_code)]

use async_trait::async_trait;
use shopwright_common::{Hint, HintError, Locator, MatchType, PageError, PageSnapshot, Rect};
use shopwright_engine::hints::{HintRequest, HintSource};
use shopwright_engine::{ElementRef, Page, Resolver, ResolverSettings};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Resolver with short timeouts for tests.
pub fn fast_resolver() -> Resolver {
    Resolver::new(ResolverSettings {
        candidate_timeout: Duration::from_millis(50),
        poll_interval: Duration::from_millis(10),
        settle_delay: Duration::ZERO,
    })
}

#[derive(Debug, Clone)]
pub struct MockElement {
    pub tag: String,
    pub text: String,
    /// Selectors (besides the tag) this element matches.
    pub selectors: Vec<String>,
    pub parent: Option<u32>,
    pub visible: bool,
    pub enabled: bool,
    pub rect: Rect,
    pub options: usize,
    pub hides_on_click: bool,
    pub reveals: Vec<u32>,
    /// Not present until this many `find` calls have been made.
    pub appears_after: usize,
    pub unreadable: bool,
}

impl MockElement {
    pub fn new(tag: &str, text: &str) -> Self {
        Self {
            tag: tag.to_string(),
            text: text.to_string(),
            selectors: Vec::new(),
            parent: None,
            visible: true,
            enabled: true,
            rect: Rect::default(),
            options: 0,
            hides_on_click: false,
            reveals: Vec::new(),
            appears_after: 0,
            unreadable: false,
        }
    }

    pub fn matching(mut self, selectors: &[&str]) -> Self {
        self.selectors
            .extend(selectors.iter().map(|s| s.to_string()));
        self
    }

    pub fn child_of(mut self, parent: ElementRef) -> Self {
        self.parent = Some(parent.0);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn at(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Rect {
            x,
            y,
            width,
            height,
        };
        self
    }

    pub fn with_options(mut self, options: usize) -> Self {
        self.options = options;
        self
    }

    pub fn hides_on_click(mut self) -> Self {
        self.hides_on_click = true;
        self
    }

    pub fn reveals(mut self, element: ElementRef) -> Self {
        self.reveals.push(element.0);
        self
    }

    pub fn appears_after(mut self, finds: usize) -> Self {
        self.appears_after = finds;
        self
    }

    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    fn matches(&self, selector: &str) -> bool {
        selector
            .split(',')
            .map(str::trim)
            .any(|part| part == self.tag || self.selectors.iter().any(|s| s == part))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Click(u32),
    ClickAt(f64, f64),
    Type(u32, String),
    Select(u32, usize),
}

/// In-memory page. Element ids start at 1, in insertion (document) order.
#[derive(Debug, Default)]
pub struct MockPage {
    pub elements: Vec<MockElement>,
    pub events: Vec<Event>,
    pub find_calls: usize,
    /// Selectors that are rejected as invalid.
    pub faulty: Vec<String>,
    /// Selectors whose lookup never completes.
    pub hanging: Vec<String>,
    pub snapshot: Option<PageSnapshot>,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: MockElement) -> ElementRef {
        self.elements.push(element);
        ElementRef(self.elements.len() as u32)
    }

    pub fn element(&self, el: ElementRef) -> &MockElement {
        &self.elements[(el.0 - 1) as usize]
    }

    pub fn clicks(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Click(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn get(&self, el: ElementRef) -> Result<&MockElement, PageError> {
        el.0
            .checked_sub(1)
            .and_then(|i| self.elements.get(i as usize))
            .ok_or(PageError::Stale { id: el.0 })
    }

    fn present(&self, id: u32) -> bool {
        self.elements[(id - 1) as usize].appears_after <= self.find_calls
    }

    fn is_within(&self, id: u32, scope: Option<ElementRef>) -> bool {
        let Some(scope) = scope else {
            return true;
        };
        let mut current = self.elements[(id - 1) as usize].parent;
        while let Some(parent) = current {
            if parent == scope.0 {
                return true;
            }
            current = self.elements[(parent - 1) as usize].parent;
        }
        false
    }

    fn text_of(&self, id: u32) -> String {
        let mut parts = vec![self.elements[(id - 1) as usize].text.clone()];
        for (i, el) in self.elements.iter().enumerate() {
            let child = i as u32 + 1;
            if el.parent == Some(id) {
                parts.push(self.text_of(child));
            }
        }
        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        (1..=self.elements.len() as u32).filter(|id| self.present(*id))
    }

    fn apply_click(&mut self, id: u32) {
        let (hides, reveals) = {
            let el = &self.elements[(id - 1) as usize];
            (el.hides_on_click, el.reveals.clone())
        };
        if hides {
            self.elements[(id - 1) as usize].visible = false;
        }
        for other in reveals {
            self.elements[(other - 1) as usize].visible = true;
        }
    }
}

#[async_trait]
impl Page for MockPage {
    async fn find(
        &mut self,
        locator: &Locator,
        within: Option<ElementRef>,
    ) -> Result<Option<ElementRef>, PageError> {
        self.find_calls += 1;

        match locator {
            Locator::Selector { selector } => {
                if self.hanging.contains(selector) {
                    std::future::pending::<()>().await;
                }
                Ok(self.find_all(selector, within).await?.into_iter().next())
            }
            Locator::Text {
                text,
                match_type,
                within: scope_selector,
            } => {
                let wanted = text.trim().to_lowercase();
                let found = self.ids().find(|id| {
                    let el = &self.elements[(*id - 1) as usize];
                    let scoped = scope_selector.as_deref().is_none_or(|s| el.matches(s));
                    let own = self.text_of(*id).trim().to_lowercase();
                    let text_ok = match match_type {
                        MatchType::Exact => own == wanted,
                        MatchType::Contains => own.contains(&wanted),
                    };
                    scoped && text_ok && self.is_within(*id, within)
                });
                Ok(found.map(ElementRef))
            }
            Locator::Point { x, y } => {
                let found = self
                    .ids()
                    .filter(|id| {
                        let el = &self.elements[(*id - 1) as usize];
                        let r = el.rect;
                        el.visible
                            && *x >= r.x
                            && *x <= r.x + r.width
                            && *y >= r.y
                            && *y <= r.y + r.height
                    })
                    .last();
                Ok(found.map(ElementRef))
            }
        }
    }

    async fn find_all(
        &mut self,
        selector: &str,
        within: Option<ElementRef>,
    ) -> Result<Vec<ElementRef>, PageError> {
        if self.faulty.iter().any(|f| f == selector) {
            return Err(PageError::SelectorInvalid {
                selector: selector.to_string(),
            });
        }
        Ok(self
            .ids()
            .filter(|id| self.elements[(*id - 1) as usize].matches(selector))
            .filter(|id| self.is_within(*id, within))
            .map(ElementRef)
            .collect())
    }

    async fn is_visible(&mut self, element: ElementRef) -> Result<bool, PageError> {
        Ok(self.get(element)?.visible)
    }

    async fn is_enabled(&mut self, element: ElementRef) -> Result<bool, PageError> {
        Ok(self.get(element)?.enabled)
    }

    async fn click(&mut self, element: ElementRef) -> Result<(), PageError> {
        self.get(element)?;
        self.events.push(Event::Click(element.0));
        self.apply_click(element.0);
        Ok(())
    }

    async fn click_at(&mut self, x: f64, y: f64) -> Result<(), PageError> {
        self.events.push(Event::ClickAt(x, y));
        if let Some(el) = self.find(&Locator::Point { x, y }, None).await? {
            self.apply_click(el.0);
        }
        Ok(())
    }

    async fn type_text(&mut self, element: ElementRef, text: &str) -> Result<(), PageError> {
        self.get(element)?;
        self.events.push(Event::Type(element.0, text.to_string()));
        Ok(())
    }

    async fn select_option(&mut self, element: ElementRef, index: usize) -> Result<(), PageError> {
        if index >= self.get(element)?.options {
            return Err(PageError::OptionNotFound {
                id: element.0,
                index,
            });
        }
        self.events.push(Event::Select(element.0, index));
        Ok(())
    }

    async fn inner_text(&mut self, element: ElementRef) -> Result<String, PageError> {
        if self.get(element)?.unreadable {
            return Err(PageError::Script("detached".into()));
        }
        Ok(self.text_of(element.0))
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, PageError> {
        self.snapshot
            .clone()
            .ok_or_else(|| PageError::NotSupported("snapshot".into()))
    }
}

/// Hint source that returns a fixed hint, or fails when none is set.
/// `requests` is shared so tests can inspect it after boxing the source.
#[derive(Default, Clone)]
pub struct ScriptedHints {
    pub hint: Option<Hint>,
    pub requests: Arc<Mutex<Vec<HintRequest>>>,
}

impl ScriptedHints {
    pub fn returning(hint: Hint) -> Self {
        Self {
            hint: Some(hint),
            requests: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn goals(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.goal.clone())
            .collect()
    }
}

#[async_trait]
impl HintSource for ScriptedHints {
    async fn suggest(&self, request: &HintRequest) -> Result<Hint, HintError> {
        self.requests.lock().unwrap().push(request.clone());
        self.hint
            .clone()
            .ok_or_else(|| HintError::Transport("connection refused".into()))
    }
}
