use regex::Regex;
use shopwright_common::{Action, Attribute, AttributeKind, Intent};
use std::sync::LazyLock;

pub const COLORS: &[&str] = &[
    "red", "blue", "green", "yellow", "black", "white", "brown", "gray", "grey", "pink", "orange",
    "purple",
];

pub const PRODUCTS: &[&str] = &[
    "shirt", "pants", "shoes", "dress", "jacket", "top", "bottom", "jeans", "tshirt", "t-shirt",
    "kurta", "saree",
];

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| word_regex(&["return", "replace", "exchange"]));
static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| word_regex(COLORS));
static PRODUCT_RE: LazyLock<Regex> = LazyLock::new(|| word_regex(PRODUCTS));

/// Case-insensitive whole-word alternation. Longer words are listed first so
/// that "t-shirt" wins over "shirt".
fn word_regex(words: &[&str]) -> Regex {
    let mut words = words.to_vec();
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).unwrap()
}

/// Parse a free-text command. Never fails: anything without an action word
/// is `Action::Unknown` with no attributes or keywords.
pub fn parse(command: &str) -> Intent {
    let action = detect_action(command);
    if action == Action::Unknown {
        return Intent::unknown();
    }

    let mut attributes = Vec::new();
    for (kind, re) in [
        (AttributeKind::Product, &*PRODUCT_RE),
        (AttributeKind::Color, &*COLOR_RE),
    ] {
        for m in re.find_iter(command) {
            let attribute = Attribute {
                kind,
                token: m.as_str().to_lowercase(),
            };
            if !attributes.contains(&attribute) {
                attributes.push(attribute);
            }
        }
    }

    let keywords = command
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();

    Intent {
        action,
        attributes,
        keywords,
    }
}

fn detect_action(command: &str) -> Action {
    let mut replace = false;
    for m in ACTION_RE.find_iter(command) {
        match m.as_str().to_lowercase().as_str() {
            "return" => return Action::Return,
            _ => replace = true,
        }
    }
    if replace {
        Action::Replace
    } else {
        Action::Unknown
    }
}
