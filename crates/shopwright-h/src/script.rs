use chromiumoxide::Page;
use serde::Deserialize;
use serde_json::Value;
use shopwright_common::PageError;
use std::time::Duration;

const PROBE_JS: &str = include_str!("probe.js");

/// Upper bound for one evaluate call; a blocking dialog would otherwise hang it.
const EVAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Retries while the page is between documents.
const MAX_CONTEXT_RETRIES: u32 = 10;
const CONTEXT_RETRY_DELAY: Duration = Duration::from_millis(100);

fn is_context_error(err: &str) -> bool {
    err.contains("Cannot find context")
        || err.contains("Execution context was destroyed")
        || err.contains("-32000")
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum ProbeReply {
    Ok {
        #[serde(default)]
        value: Value,
    },
    Error {
        kind: String,
        message: String,
    },
}

enum EvalError {
    Timeout,
    Context(String),
    Other(String),
}

async fn evaluate(page: &Page, expression: &str) -> Result<Value, EvalError> {
    match tokio::time::timeout(EVAL_TIMEOUT, page.evaluate(expression)).await {
        Err(_) => Err(EvalError::Timeout),
        Ok(Err(e)) => {
            let err = e.to_string();
            if is_context_error(&err) {
                Err(EvalError::Context(err))
            } else {
                Err(EvalError::Other(err))
            }
        }
        Ok(Ok(remote)) => Ok(remote.into_value::<Value>().unwrap_or(Value::Null)),
    }
}

/// Run one probe action. The probe is (re)installed on demand since every
/// navigation drops it.
pub async fn call(page: &Page, request: Value) -> Result<Value, PageError> {
    let action = request
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let expression = format!(
        "{}\nwindow.Shopwright.process({})",
        PROBE_JS,
        serde_json::to_string(&request)?
    );

    let mut last_error = None;
    for attempt in 0..MAX_CONTEXT_RETRIES {
        match evaluate(page, &expression).await {
            Ok(value) => return interpret(&request, value),
            Err(EvalError::Timeout) => {
                return Err(PageError::Timeout {
                    operation: format!("{} (is a dialog blocking the page?)", action),
                });
            }
            Err(EvalError::Context(err)) => {
                tracing::debug!(
                    action = %action,
                    "context lost (attempt {}/{}), retrying",
                    attempt + 1,
                    MAX_CONTEXT_RETRIES
                );
                last_error = Some(err);
                tokio::time::sleep(CONTEXT_RETRY_DELAY).await;
            }
            Err(EvalError::Other(err)) => return Err(PageError::Script(err)),
        }
    }

    Err(PageError::Script(
        last_error.unwrap_or_else(|| format!("{} failed after retries", action)),
    ))
}

fn interpret(request: &Value, value: Value) -> Result<Value, PageError> {
    let id = request.get("id").and_then(Value::as_u64).unwrap_or(0) as u32;

    match serde_json::from_value::<ProbeReply>(value)? {
        ProbeReply::Ok { value } => Ok(value),
        ProbeReply::Error { kind, message } => Err(match kind.as_str() {
            "stale" => PageError::Stale { id },
            "not_interactable" => PageError::NotInteractable {
                id,
                reason: message,
            },
            "option" => PageError::OptionNotFound {
                id,
                index: request.get("index").and_then(Value::as_u64).unwrap_or(0) as usize,
            },
            "invalid_selector" => PageError::SelectorInvalid {
                selector: request
                    .get("selector")
                    .or_else(|| request.pointer("/locator/selector"))
                    .and_then(Value::as_str)
                    .unwrap_or(&message)
                    .to_string(),
            },
            "unsupported" => PageError::NotSupported(message),
            _ => PageError::Script(message),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_reply_yields_value() {
        let value = interpret(&json!({"action": "find"}), json!({"status": "ok", "value": 42})).unwrap();
        assert_eq!(value, json!(42));
    }

    #[test]
    fn test_stale_reply_carries_element_id() {
        let err = interpret(
            &json!({"action": "visible", "id": 7}),
            json!({"status": "error", "kind": "stale", "message": "element 7 is gone"}),
        )
        .unwrap_err();
        assert!(matches!(err, PageError::Stale { id: 7 }));
    }

    #[test]
    fn test_invalid_selector_names_the_selector() {
        let err = interpret(
            &json!({"action": "find", "locator": {"kind": "selector", "selector": "div[[" }}),
            json!({"status": "error", "kind": "invalid_selector", "message": "not valid"}),
        )
        .unwrap_err();
        match err {
            PageError::SelectorInvalid { selector } => assert_eq!(selector, "div[["),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_option_reply_keeps_requested_index() {
        let err = interpret(
            &json!({"action": "select", "id": 3, "index": 5}),
            json!({"status": "error", "kind": "option", "message": "only 2 options"}),
        )
        .unwrap_err();
        assert!(matches!(err, PageError::OptionNotFound { id: 3, index: 5 }));
    }

    #[test]
    fn test_context_errors_are_recognised() {
        assert!(is_context_error("Execution context was destroyed"));
        assert!(!is_context_error("ReferenceError: x is not defined"));
    }
}
