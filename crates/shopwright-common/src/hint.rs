use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl Point {
    /// `(0, 0)` is what services send when they have no coordinate.
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Confidence reported by a hint service. Services send either a label
/// ("high") or a number in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Confidence {
    fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => Confidence::High,
            "medium" => Confidence::Medium,
            "low" => Confidence::Low,
            _ => Confidence::Unknown,
        }
    }

    fn from_score(score: f64) -> Self {
        if score >= 0.75 {
            Confidence::High
        } else if score >= 0.4 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) => Confidence::from_label(&s),
            serde_json::Value::Number(n) => n.as_f64().map(Confidence::from_score).unwrap_or_default(),
            _ => Confidence::Unknown,
        })
    }
}

/// One suggested location for a goal's target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HintTarget {
    #[serde(alias = "recommended_selector")]
    pub selector: Option<String>,
    pub text: Option<String>,
    #[serde(alias = "coordinates")]
    pub point: Option<Point>,
    pub tag: Option<String>,
    pub confidence: Confidence,
}

impl HintTarget {
    pub fn selector(&self) -> Option<&str> {
        non_blank(self.selector.as_deref())
    }

    pub fn text(&self) -> Option<&str> {
        non_blank(self.text.as_deref())
    }

    pub fn point(&self) -> Option<Point> {
        self.point.filter(|p| !p.is_origin())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Structured suggestion returned by the hint service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Hint {
    #[serde(alias = "login_found")]
    pub found: bool,
    #[serde(alias = "login_element")]
    pub primary: Option<HintTarget>,
    pub alternatives: Vec<HintTarget>,
    pub reasoning: Option<String>,
}

impl Hint {
    /// Primary target first, then alternatives in the order given.
    pub fn targets(&self) -> impl Iterator<Item = &HintTarget> {
        self.primary.iter().chain(self.alternatives.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_field_names() {
        let hint: Hint = serde_json::from_value(json!({
            "login_found": true,
            "login_element": {
                "text": "Sign In",
                "tag": "a",
                "recommended_selector": "a.login-link",
                "coordinates": {"x": 1200, "y": 40},
                "confidence": "high"
            },
            "reasoning": "header link",
            "alternatives": [
                {"text": "Account", "selector": "#account", "confidence": "medium"}
            ]
        }))
        .unwrap();

        assert!(hint.found);
        let primary = hint.primary.as_ref().unwrap();
        assert_eq!(primary.selector(), Some("a.login-link"));
        assert_eq!(primary.point(), Some(Point { x: 1200.0, y: 40.0 }));
        assert_eq!(primary.confidence, Confidence::High);
        assert_eq!(hint.targets().count(), 2);
    }

    #[test]
    fn test_numeric_confidence_and_blank_fields() {
        let target: HintTarget = serde_json::from_value(json!({
            "selector": "  ",
            "text": "",
            "coordinates": {"x": 0, "y": 0},
            "confidence": 0.5
        }))
        .unwrap();

        assert_eq!(target.confidence, Confidence::Medium);
        assert_eq!(target.selector(), None);
        assert_eq!(target.text(), None);
        assert_eq!(target.point(), None);
    }

    #[test]
    fn test_missing_fields_default() {
        let hint: Hint = serde_json::from_value(json!({})).unwrap();
        assert!(!hint.found);
        assert_eq!(hint.targets().count(), 0);
    }
}
