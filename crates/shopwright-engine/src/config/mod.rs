pub mod defaults;
pub mod loader;
pub mod schema;

pub use defaults::goals;
pub use loader::{ConfigError, ConfigLoader};
pub use schema::{
    HintConfig, HintProvider, PopupConfig, ResolverConfig, ShopwrightConfig, SiteConfig,
    StrategyConfig,
};
