use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin of a candidate. The source alone fixes the order in which
/// candidates are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    StaticSelector,
    HintSelector,
    HintCoordinate,
    HintText,
    TextFallback,
}

impl CandidateSource {
    /// Rank of the source; lower ranks are attempted first.
    pub fn priority(self) -> u8 {
        match self {
            CandidateSource::StaticSelector => 0,
            CandidateSource::HintSelector => 1,
            CandidateSource::HintText => 2,
            CandidateSource::TextFallback => 3,
            CandidateSource::HintCoordinate => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CandidateSource::StaticSelector => "static-selector",
            CandidateSource::HintSelector => "hint-selector",
            CandidateSource::HintCoordinate => "hint-coordinate",
            CandidateSource::HintText => "hint-text",
            CandidateSource::TextFallback => "text-fallback",
        }
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    #[default]
    Exact,
    Contains,
}

/// How a candidate finds its target on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    /// CSS/structural selector.
    Selector { selector: String },
    /// Viewport coordinate.
    Point { x: f64, y: f64 },
    /// Visible text, optionally restricted to elements matching `within`.
    Text {
        text: String,
        #[serde(default)]
        match_type: MatchType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        within: Option<String>,
    },
}

impl Locator {
    pub fn selector(selector: impl Into<String>) -> Self {
        Locator::Selector {
            selector: selector.into(),
        }
    }

    pub fn exact_text(text: impl Into<String>) -> Self {
        Locator::Text {
            text: text.into(),
            match_type: MatchType::Exact,
            within: None,
        }
    }

    pub fn text_within(within: impl Into<String>, text: impl Into<String>) -> Self {
        Locator::Text {
            text: text.into(),
            match_type: MatchType::Contains,
            within: Some(within.into()),
        }
    }

    /// Parse the selector notation used in configuration tables.
    ///
    /// - `text="Sign In"` (or `text=Sign In`) is an exact text locator
    /// - `button:has-text("Skip")` is a contains-text locator scoped to `button`
    /// - anything else is passed through as a CSS selector
    pub fn parse_notation(raw: &str) -> Self {
        let raw = raw.trim();

        if let Some(rest) = raw.strip_prefix("text=") {
            return Locator::exact_text(unquote(rest));
        }

        if let Some(idx) = raw.find(":has-text(")
            && raw.ends_with(')')
        {
            let scope = raw[..idx].trim();
            let inner = &raw[idx + ":has-text(".len()..raw.len() - 1];
            return Locator::Text {
                text: unquote(inner).to_string(),
                match_type: MatchType::Contains,
                within: (!scope.is_empty()).then(|| scope.to_string()),
            };
        }

        Locator::selector(raw)
    }

    /// Literal text this locator matches on, if any.
    pub fn literal_text(&self) -> Option<&str> {
        match self {
            Locator::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }
}

fn unquote(s: &str) -> &str {
    let s = s.trim();
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Selector { selector } => f.write_str(selector),
            Locator::Point { x, y } => write!(f, "({}, {})", x, y),
            Locator::Text {
                text,
                match_type: MatchType::Exact,
                within: None,
            } => write!(f, "text=\"{}\"", text),
            Locator::Text {
                text,
                match_type,
                within,
            } => {
                let verb = match match_type {
                    MatchType::Exact => "has-exact-text",
                    MatchType::Contains => "has-text",
                };
                write!(f, "{}:{}(\"{}\")", within.as_deref().unwrap_or("*"), verb, text)
            }
        }
    }
}

/// One proposed way to satisfy a resolution goal. Created per resolution call
/// and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub source: CandidateSource,
    pub locator: Locator,
    pub label: String,
}

impl Candidate {
    pub fn new(source: CandidateSource, locator: Locator, label: impl Into<String>) -> Self {
        Self {
            source,
            locator,
            label: label.into(),
        }
    }

    /// Candidate from a configuration table entry.
    pub fn from_notation(raw: &str) -> Self {
        let locator = Locator::parse_notation(raw);
        let label = format!("static {}", locator);
        Self::new(CandidateSource::StaticSelector, locator, label)
    }

    pub fn priority(&self) -> u8 {
        self.source.priority()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.source, self.label)
    }
}
