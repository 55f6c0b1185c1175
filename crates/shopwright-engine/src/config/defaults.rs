//! Built-in selector tables. Entries use the locator notation understood by
//! `Locator::parse_notation`.

pub mod goals {
    pub const LOGIN_BUTTON: &str = "login.login_button";
    pub const PHONE_INPUT: &str = "login.phone_input";
    pub const OTP_BUTTON: &str = "login.otp_button";
    pub const OTP_INPUT: &str = "login.otp_input";
    pub const VERIFY_BUTTON: &str = "login.verify_button";
    pub const ORDER_RECORD: &str = "orders.record";
    pub const RETURN_CONTROL: &str = "orders.return_control";
    pub const REPLACE_CONTROL: &str = "orders.replace_control";
    pub const RETURN_REASON_SELECT: &str = "return.reason_select";
    pub const RETURN_REASON_TEXT: &str = "return.reason_text";
    pub const RETURN_CONFIRM: &str = "return.confirm";
    pub const REPLACE_VARIANT_SELECT: &str = "replace.variant_select";
    pub const REPLACE_CONFIRM: &str = "replace.confirm";
}

pub const BASE_URL: &str = "https://www.ajio.com";
pub const LOGIN_URL: &str = "https://www.ajio.com/login";
pub const ORDERS_URL: &str = "https://www.ajio.com/my-account/orders";

pub const HINT_ENDPOINT: &str = "https://api.groq.com/openai/v1";
pub const HINT_MODEL: &str = "llama3-8b-8192";
pub const HINT_API_KEY_ENV: &str = "GROQ_API_KEY";

const LOGIN_BUTTON: &[&str] = &[
    "[data-testid=\"login-button\"]",
    "text=\"Sign In\"",
    "text=\"Login\"",
    ".login-btn",
    "[title=\"Login\"]",
    "a[href*=\"login\"]",
];

const PHONE_INPUT: &[&str] = &[
    "input[name=\"username\"]",
    "input[placeholder*=\"phone\"]",
    "input[placeholder*=\"mobile\"]",
    "input[type=\"tel\"]",
    "#username",
];

const OTP_BUTTON: &[&str] = &[
    "text=\"Send OTP\"",
    "text=\"Get OTP\"",
    "button[type=\"submit\"]",
    ".otp-btn",
    "[data-testid=\"send-otp\"]",
];

const OTP_INPUT: &[&str] = &[
    "input[name=\"otp\"]",
    "input[placeholder*=\"OTP\"]",
    "input[placeholder*=\"code\"]",
    ".otp-input",
    "[data-testid=\"otp-input\"]",
];

const VERIFY_BUTTON: &[&str] = &[
    "text=\"Verify\"",
    "text=\"Login\"",
    "text=\"Submit\"",
    "button[type=\"submit\"]",
    ".verify-btn",
    "[data-testid=\"verify-otp\"]",
];

// Tried in order; the first selector with any match defines the record set.
const ORDER_RECORD: &[&str] = &[
    ".order-card, .order-item, [data-testid=\"order\"]",
    "div[class*=\"order\"]",
];

const RETURN_CONTROL: &[&str] = &["button:has-text(\"Return\")", "a:has-text(\"Return\")"];

const REPLACE_CONTROL: &[&str] = &[
    "button:has-text(\"Replace\")",
    "a:has-text(\"Replace\")",
    "button:has-text(\"Exchange\")",
    "a:has-text(\"Exchange\")",
];

const RETURN_REASON_SELECT: &[&str] = &[
    "select[name*=\"reason\"]",
    ".reason-select",
    "[data-testid=\"return-reason\"]",
];

const RETURN_REASON_TEXT: &[&str] = &["input[name*=\"reason\"]", "textarea[name*=\"reason\"]"];

const RETURN_CONFIRM: &[&str] = &[
    "text=\"Confirm Return\"",
    "text=\"Submit Return\"",
    "button[type=\"submit\"]",
    ".confirm-btn",
    "[data-testid=\"confirm-return\"]",
];

const REPLACE_VARIANT_SELECT: &[&str] = &[
    "select[name*=\"size\"]",
    "select[name*=\"variant\"]",
    ".size-select",
    "[data-testid=\"size-select\"]",
];

const REPLACE_CONFIRM: &[&str] = &[
    "text=\"Confirm Replace\"",
    "text=\"Submit Exchange\"",
    "button[type=\"submit\"]",
    ".confirm-btn",
    "[data-testid=\"confirm-replace\"]",
];

pub const POPUP_STRATEGIES: &[(&str, &[&str])] = &[
    (
        "Cookie Consent",
        &[
            "button:has-text(\"Accept\")",
            "button:has-text(\"Accept All\")",
            "button:has-text(\"I Accept\")",
            "[data-testid=\"cookie-accept\"]",
            ".cookie-accept",
            "#cookie-accept",
        ],
    ),
    (
        "Newsletter Popup",
        &[
            "button:has-text(\"No Thanks\")",
            "button:has-text(\"Later\")",
            "button:has-text(\"Skip\")",
            "button:has-text(\"Close\")",
            "[aria-label=\"Close\"]",
            ".close-btn",
            ".popup-close",
        ],
    ),
    (
        "App Download Popup",
        &[
            "button:has-text(\"Maybe Later\")",
            "button:has-text(\"Not Now\")",
            "button:has-text(\"Continue on Web\")",
            ".app-banner-close",
            "[data-testid=\"app-banner-close\"]",
        ],
    ),
    (
        "Location Popup",
        &[
            "button:has-text(\"Skip\")",
            "button:has-text(\"Not Now\")",
            "button:has-text(\"Continue Without Location\")",
            ".location-skip",
            "[data-testid=\"location-skip\"]",
        ],
    ),
    (
        "Generic Close Button",
        &[
            "button[aria-label=\"Close\"]",
            "button[title=\"Close\"]",
            ".close",
            ".close-button",
            ".modal-close",
            "svg[class*=\"close\"]",
            "[role=\"button\"]:has-text(\"×\")",
            "[role=\"button\"]:has-text(\"✕\")",
        ],
    ),
];

pub fn selectors_for(goal: &str) -> &'static [&'static str] {
    match goal {
        goals::LOGIN_BUTTON => LOGIN_BUTTON,
        goals::PHONE_INPUT => PHONE_INPUT,
        goals::OTP_BUTTON => OTP_BUTTON,
        goals::OTP_INPUT => OTP_INPUT,
        goals::VERIFY_BUTTON => VERIFY_BUTTON,
        goals::ORDER_RECORD => ORDER_RECORD,
        goals::RETURN_CONTROL => RETURN_CONTROL,
        goals::REPLACE_CONTROL => REPLACE_CONTROL,
        goals::RETURN_REASON_SELECT => RETURN_REASON_SELECT,
        goals::RETURN_REASON_TEXT => RETURN_REASON_TEXT,
        goals::RETURN_CONFIRM => RETURN_CONFIRM,
        goals::REPLACE_VARIANT_SELECT => REPLACE_VARIANT_SELECT,
        goals::REPLACE_CONFIRM => REPLACE_CONFIRM,
        _ => &[],
    }
}

/// Plain-language description of a goal, used when asking the hint service.
pub fn describe(goal: &str) -> &'static str {
    match goal {
        goals::LOGIN_BUTTON => "the login or sign-in button or link",
        goals::PHONE_INPUT => "the mobile number input of the login form",
        goals::OTP_BUTTON => "the button that sends a one-time password",
        goals::OTP_INPUT => "the one-time password input",
        goals::VERIFY_BUTTON => "the button that verifies the one-time password",
        _ => "the element needed for the current step",
    }
}
