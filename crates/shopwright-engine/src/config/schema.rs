use super::defaults;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopwrightConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub popups: PopupConfig,
    /// Per-goal overrides of the built-in selector tables.
    #[serde(default)]
    pub selectors: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub hints: HintConfig,
}

impl ShopwrightConfig {
    /// Static selectors for a goal: the file's list if it names the goal,
    /// otherwise the built-in table.
    pub fn selectors_for(&self, goal: &str) -> Vec<String> {
        match self.selectors.get(goal) {
            Some(list) => list.clone(),
            None => defaults::selectors_for(goal)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_login_url")]
    pub login_url: String,
    #[serde(default = "default_orders_url")]
    pub orders_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_url: default_login_url(),
            orders_url: default_orders_url(),
        }
    }
}

fn default_base_url() -> String {
    defaults::BASE_URL.to_string()
}

fn default_login_url() -> String {
    defaults::LOGIN_URL.to_string()
}

fn default_orders_url() -> String {
    defaults::ORDERS_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_candidate_timeout_ms")]
    pub candidate_timeout_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            candidate_timeout_ms: default_candidate_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

fn default_candidate_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_settle_delay_ms() -> u64 {
    500
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub name: String,
    pub selectors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopupConfig {
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    #[serde(default = "default_round_delay_ms")]
    pub round_delay_ms: u64,
    #[serde(default = "default_popup_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default)]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_strategies")]
    pub strategies: Vec<StrategyConfig>,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            round_delay_ms: default_round_delay_ms(),
            settle_delay_ms: default_popup_settle_delay_ms(),
            probe_timeout_ms: 0,
            strategies: default_strategies(),
        }
    }
}

fn default_max_rounds() -> usize {
    3
}

fn default_round_delay_ms() -> u64 {
    2000
}

fn default_popup_settle_delay_ms() -> u64 {
    1000
}

fn default_strategies() -> Vec<StrategyConfig> {
    defaults::POPUP_STRATEGIES
        .iter()
        .map(|(name, selectors)| StrategyConfig {
            name: name.to_string(),
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintProvider {
    /// Plain JSON endpoint that answers `{goal, snapshot}` with a hint.
    Http,
    /// OpenAI-compatible chat completions API.
    #[default]
    Chat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub provider: HintProvider,
    #[serde(default = "default_hint_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_hint_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_hint_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_elements")]
    pub max_elements: usize,
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: HintProvider::default(),
            endpoint: default_hint_endpoint(),
            model: default_hint_model(),
            api_key_env: default_api_key_env(),
            timeout_ms: default_hint_timeout_ms(),
            max_elements: default_max_elements(),
            max_text_len: default_max_text_len(),
        }
    }
}

fn default_hint_endpoint() -> String {
    defaults::HINT_ENDPOINT.to_string()
}

fn default_hint_model() -> String {
    defaults::HINT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    defaults::HINT_API_KEY_ENV.to_string()
}

fn default_hint_timeout_ms() -> u64 {
    30000
}

fn default_max_elements() -> usize {
    150
}

fn default_max_text_len() -> usize {
    100
}
