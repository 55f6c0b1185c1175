use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::task::JoinHandle;

/// Pins the Chromium profile so a login survives between runs.
pub const USER_DATA_DIR_ENV: &str = "SHOPWRIGHT_USER_DATA_DIR";
pub const CHROME_BIN_ENV: &str = "CHROME_BIN";

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser session error: {0}")]
    Session(String),

    #[error("Profile directory error: {0}")]
    Profile(#[from] std::io::Error),
}

/// A launched Chromium with one open tab.
pub struct CdpClient {
    pub browser: Browser,
    pub handler_task: JoinHandle<()>,
    pub page: Page,
    user_data_dir: PathBuf,
    cleanup_user_data_dir: bool,
}

impl CdpClient {
    pub async fn launch(visible: bool) -> Result<Self, DriverError> {
        let (user_data_dir, cleanup_user_data_dir) = resolve_user_data_dir()?;

        // no_sandbox: containers and CI refuse the sandbox
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .user_data_dir(&user_data_dir)
            .window_size(1366, 900);

        if visible {
            tracing::info!("launching browser in visible mode");
            builder = builder.with_head();
        } else {
            tracing::info!("launching browser in headless mode");
        }

        if let Ok(chrome_bin) = std::env::var(CHROME_BIN_ENV) {
            tracing::info!(chrome_bin = %chrome_bin, "using custom Chrome binary");
            builder = builder.chrome_executable(chrome_bin);
        }

        let config = builder.build().map_err(DriverError::Launch)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler error (ignored): {}", e);
                }
            }
            tracing::debug!("browser handler task ended");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::Session(format!("failed to open tab: {}", e)))?;

        let mut console_events = page
            .event_listener::<EventConsoleApiCalled>()
            .await
            .map_err(|e| DriverError::Session(e.to_string()))?;
        tokio::spawn(async move {
            while let Some(event) = console_events.next().await {
                let args: Vec<String> = event
                    .args
                    .iter()
                    .map(|arg| arg.description.clone().unwrap_or_default())
                    .collect();
                tracing::trace!(kind = ?event.r#type, "console: {}", args.join(" "));
            }
        });

        // alert/confirm/prompt would block every later evaluate call
        let mut dialog_events = page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(|e| DriverError::Session(e.to_string()))?;
        let dialog_page = page.clone();
        tokio::spawn(async move {
            while let Some(event) = dialog_events.next().await {
                tracing::info!(kind = ?event.r#type, "accepting dialog: {}", event.message);
                if let Err(e) = dialog_page
                    .execute(HandleJavaScriptDialogParams::new(true))
                    .await
                {
                    tracing::warn!("failed to accept dialog: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
            page,
            user_data_dir,
            cleanup_user_data_dir,
        })
    }

    pub async fn close(mut self) -> Result<(), DriverError> {
        self.browser
            .close()
            .await
            .map_err(|e| DriverError::Session(format!("error closing browser: {}", e)))?;
        self.handler_task
            .await
            .map_err(|e| DriverError::Session(format!("error awaiting handler: {}", e)))?;

        if self.cleanup_user_data_dir
            && let Err(e) = std::fs::remove_dir_all(&self.user_data_dir)
        {
            tracing::debug!(
                "failed to clean up profile {}: {}",
                self.user_data_dir.display(),
                e
            );
        }
        Ok(())
    }
}

/// Pinned profile from the environment, else a throwaway one that is removed
/// on close.
fn resolve_user_data_dir() -> Result<(PathBuf, bool), DriverError> {
    if let Ok(dir) = std::env::var(USER_DATA_DIR_ENV) {
        let path = PathBuf::from(dir);
        std::fs::create_dir_all(&path)?;
        tracing::info!(profile = %path.display(), "using pinned browser profile");
        return Ok((path, false));
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let unique = format!("shopwright-profile-{}-{}", std::process::id(), nanos);
    let path = std::env::temp_dir().join(unique);
    std::fs::create_dir_all(&path)?;
    tracing::debug!(profile = %path.display(), "using throwaway browser profile");
    Ok((path, true))
}
