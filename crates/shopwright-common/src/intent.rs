use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Return,
    Replace,
    Unknown,
}

impl Action {
    /// Words that identify a control performing this action.
    pub fn control_keywords(self) -> &'static [&'static str] {
        match self {
            Action::Return => &["return"],
            Action::Replace => &["replace", "exchange"],
            Action::Unknown => &[],
        }
    }

    /// True if `text` names a control for this action (case-insensitive).
    pub fn matches_control_text(self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.control_keywords().iter().any(|kw| text.contains(kw))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Return => "return",
            Action::Replace => "replace",
            Action::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Color,
    Product,
}

impl AttributeKind {
    /// Score contributed by one matching attribute of this kind.
    pub fn weight(self) -> f64 {
        match self {
            AttributeKind::Product => 3.0,
            AttributeKind::Color => 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub token: String,
}

impl Attribute {
    pub fn color(token: impl Into<String>) -> Self {
        Self {
            kind: AttributeKind::Color,
            token: token.into(),
        }
    }

    pub fn product(token: impl Into<String>) -> Self {
        Self {
            kind: AttributeKind::Product,
            token: token.into(),
        }
    }
}

/// Structured form of a free-text command such as "return my red shoes".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub action: Action,
    /// Distinct attribute tokens in the order they appear in the command.
    pub attributes: Vec<Attribute>,
    /// Every whitespace-delimited token, lower-cased.
    pub keywords: Vec<String>,
}

impl Intent {
    pub fn unknown() -> Self {
        Self {
            action: Action::Unknown,
            attributes: Vec::new(),
            keywords: Vec::new(),
        }
    }

    /// An unknown action must never reach the page.
    pub fn is_actionable(&self) -> bool {
        self.action != Action::Unknown
    }
}
