use serde_json::json;
use shopwright_common::{CandidateSource, Hint, Locator};
use shopwright_engine::CandidateGenerator;
use shopwright_engine::config::{ShopwrightConfig, goals};

fn hint(value: serde_json::Value) -> Hint {
    serde_json::from_value(value).unwrap()
}

fn sources(generator: &CandidateGenerator, goal: &str, hint: Option<&Hint>) -> Vec<CandidateSource> {
    generator
        .generate(goal, hint)
        .iter()
        .map(|c| c.source)
        .collect()
}

#[test]
fn test_sources_follow_priority_regardless_of_hint_layout() {
    let generator = CandidateGenerator::new(&ShopwrightConfig::default())
        .with_selectors("g", vec![".static-a".into(), ".static-b".into()]);
    let hint = hint(json!({
        "found": true,
        "primary": {
            "selector": "#primary",
            "text": "Sign In",
            "coordinates": {"x": 100, "y": 20}
        },
        "alternatives": [
            {"selector": "#alt", "coordinates": {"x": 300, "y": 20}},
            {"text": "Account"}
        ]
    }));

    let candidates = generator.generate("g", Some(&hint));
    let labels: Vec<String> = candidates.iter().map(|c| c.locator.to_string()).collect();

    assert_eq!(
        labels,
        vec![
            ".static-a",
            ".static-b",
            "#primary",
            "#alt",
            "text=\"Sign In\"",
            "text=\"Account\"",
            "button:has-text(\"Sign In\")",
            "a:has-text(\"Sign In\")",
            "[role=\"button\"]:has-text(\"Sign In\")",
            "button:has-text(\"Account\")",
            "a:has-text(\"Account\")",
            "[role=\"button\"]:has-text(\"Account\")",
            "(100, 20)",
            "(300, 20)",
        ]
    );

    let priorities: Vec<u8> = candidates.iter().map(|c| c.priority()).collect();
    let mut sorted = priorities.clone();
    sorted.sort();
    assert_eq!(priorities, sorted);
}

#[test]
fn test_not_found_hint_adds_nothing() {
    let generator = CandidateGenerator::new(&ShopwrightConfig::default());
    let hint = hint(json!({
        "login_found": false,
        "login_element": {"recommended_selector": "#ignored"},
        "reasoning": "page has no login"
    }));

    assert_eq!(
        generator.generate(goals::OTP_INPUT, Some(&hint)),
        generator.generate(goals::OTP_INPUT, None)
    );
}

#[test]
fn test_hint_only_goal_still_produces_candidates() {
    let generator = CandidateGenerator::new(&ShopwrightConfig::default());
    let hint = hint(json!({
        "found": true,
        "primary": {"text": "Continue", "coordinates": {"x": 0, "y": 0}}
    }));

    let candidates = generator.generate("checkout.continue", Some(&hint));
    assert_eq!(
        sources(&generator, "checkout.continue", Some(&hint)),
        vec![
            CandidateSource::HintText,
            CandidateSource::TextFallback,
            CandidateSource::TextFallback,
            CandidateSource::TextFallback,
        ]
    );
    assert_eq!(candidates[0].locator, Locator::exact_text("Continue"));
}

#[test]
fn test_static_text_shared_with_hint_yields_one_fallback_set() {
    let generator = CandidateGenerator::new(&ShopwrightConfig::default());
    let hint = hint(json!({"found": true, "primary": {"text": "Login"}}));

    let candidates = generator.generate(goals::LOGIN_BUTTON, Some(&hint));
    let fallbacks = candidates
        .iter()
        .filter(|c| c.source == CandidateSource::TextFallback)
        .count();
    // "Sign In" and "Login" once each
    assert_eq!(fallbacks, 6);
}

#[test]
fn test_config_override_replaces_builtin_table() {
    let config: ShopwrightConfig = serde_yaml::from_str(
        r##"
selectors:
  login.otp_button:
    - "#send"
"##,
    )
    .unwrap();
    let generator = CandidateGenerator::new(&config);

    let candidates = generator.generate(goals::OTP_BUTTON, None);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].locator, Locator::selector("#send"));
}
