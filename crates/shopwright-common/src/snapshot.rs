use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A visible clickable element as reported to the hint service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractiveElement {
    pub tag: String,
    pub text: String,
    pub id: String,
    #[serde(rename = "className")]
    pub class_name: String,
    pub href: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub rect: Rect,
    /// Selector used to collect the element, with its index among matches.
    pub selector: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    pub tag: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub name: String,
    pub placeholder: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInfo {
    pub index: usize,
    pub action: String,
    pub method: String,
    pub inputs: Vec<FormInput>,
}

/// Serialized view of the page sent to the external hint service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSnapshot {
    pub title: String,
    pub url: String,
    pub header_text: String,
    pub interactive_elements: Vec<InteractiveElement>,
    pub forms: Vec<FormInfo>,
}

impl PageSnapshot {
    /// Enforce the element-count and per-element text bounds.
    pub fn bounded(mut self, max_elements: usize, max_text_len: usize) -> Self {
        self.interactive_elements.truncate(max_elements);
        for el in &mut self.interactive_elements {
            truncate_chars(&mut el.text, max_text_len);
        }
        truncate_chars(&mut self.header_text, max_text_len * 10);
        self
    }
}

fn truncate_chars(s: &mut String, max: usize) {
    if let Some((idx, _)) = s.char_indices().nth(max) {
        s.truncate(idx);
    }
}
