mod common;

use common::{Event, MockElement, MockPage, ScriptedHints, fast_resolver};
use serde_json::json;
use shopwright_common::{CandidateSource, Hint, PageSnapshot, ResolveError};
use shopwright_engine::config::{ShopwrightConfig, goals};
use shopwright_engine::flows::{FlowError, LoginFlow, StaticOtp};

fn flow() -> LoginFlow {
    LoginFlow::new(&ShopwrightConfig::default())
        .with_resolver(fast_resolver())
        .without_popups()
}

fn login_form(page: &mut MockPage) -> [u32; 4] {
    let phone = page.add(MockElement::new("input", "").matching(&["input[name=\"username\"]"]));
    let send = page.add(MockElement::new("button", "Send OTP"));
    let otp = page.add(MockElement::new("input", "").matching(&["input[name=\"otp\"]"]));
    let verify = page.add(MockElement::new("button", "Verify"));
    [phone.0, send.0, otp.0, verify.0]
}

#[tokio::test]
async fn test_login_with_static_selectors() {
    let mut page = MockPage::new();
    let sign_in = page.add(MockElement::new("a", "Sign In"));
    let [phone, send, otp, verify] = login_form(&mut page);

    let report = flow()
        .run(&mut page, "9876543210", &StaticOtp("482913".into()))
        .await
        .unwrap();

    assert_eq!(report.steps.len(), 5);
    assert!(report.popups.is_none());
    assert_eq!(
        page.events,
        vec![
            Event::Click(sign_in.0),
            Event::Type(phone, "9876543210".into()),
            Event::Click(send),
            Event::Type(otp, "482913".into()),
            Event::Click(verify),
        ]
    );
}

#[tokio::test]
async fn test_hint_finds_login_control_static_tables_miss() {
    let mut page = MockPage::new();
    page.snapshot = Some(PageSnapshot {
        title: "AJIO".into(),
        ..Default::default()
    });
    let account = page.add(MockElement::new("span", "Hello, Guest").matching(&["#acct-menu"]));
    login_form(&mut page);

    let hint: Hint = serde_json::from_value(json!({
        "found": true,
        "primary": {"selector": "#acct-menu", "confidence": "high"}
    }))
    .unwrap();
    let hints = ScriptedHints::returning(hint);
    let flow = flow().with_hints(Box::new(hints.clone()));

    let report = flow
        .run(&mut page, "9876543210", &StaticOtp("1111".into()))
        .await
        .unwrap();

    let first = &report.steps[0];
    assert_eq!(
        first.winning_candidate.as_ref().map(|c| c.source),
        Some(CandidateSource::HintSelector)
    );
    assert_eq!(page.clicks().first(), Some(&account.0));
    assert_eq!(hints.goals().len(), 5);
    assert_eq!(hints.goals()[0], goals::LOGIN_BUTTON);
}

#[tokio::test]
async fn test_unavailable_hint_service_degrades_to_static() {
    let mut page = MockPage::new();
    page.snapshot = Some(PageSnapshot::default());
    page.add(MockElement::new("button", "Login").matching(&[".login-btn"]));
    login_form(&mut page);

    let hints = ScriptedHints::failing();
    let report = flow()
        .with_hints(Box::new(hints.clone()))
        .run(&mut page, "9876543210", &StaticOtp("1111".into()))
        .await
        .unwrap();

    assert_eq!(report.steps.len(), 5);
    assert_eq!(hints.goals().len(), 5);
}

#[tokio::test]
async fn test_failed_step_reports_goal_and_attempts() {
    let mut page = MockPage::new();
    page.add(MockElement::new("a", "Sign In"));
    page.add(MockElement::new("input", "").matching(&["#username"]));
    // no OTP button anywhere

    let err = flow()
        .run(&mut page, "9876543210", &StaticOtp("1111".into()))
        .await
        .unwrap_err();

    match err {
        FlowError::Step { goal, source } => {
            assert_eq!(goal, goals::OTP_BUTTON);
            match source {
                ResolveError::ExhaustedCandidates { attempts, .. } => {
                    assert!(attempts.len() >= 5);
                    assert!(attempts.iter().all(|a| !a.outcome.is_success()));
                }
                other => panic!("expected exhaustion, got {:?}", other),
            }
        }
        other => panic!("expected step failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_popups_are_dismissed_first() {
    let mut config = ShopwrightConfig::default();
    config.popups.round_delay_ms = 0;
    config.popups.settle_delay_ms = 0;

    let mut page = MockPage::new();
    let cookie = page.add(MockElement::new("button", "Accept").hides_on_click());
    page.add(MockElement::new("a", "Sign In"));
    login_form(&mut page);

    let report = LoginFlow::new(&config)
        .with_resolver(fast_resolver())
        .run(&mut page, "9876543210", &StaticOtp("1111".into()))
        .await
        .unwrap();

    let popups = report.popups.unwrap();
    assert_eq!(popups.dismissed, vec!["Cookie Consent"]);
    assert_eq!(page.clicks().first(), Some(&cookie.0));
}
