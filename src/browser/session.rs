//! Browser session lifecycle.
//!
//! One headless Chrome per program run: launched before login, closed
//! explicitly at exit. System Chrome is tried first; when none is found a
//! compatible Chromium is downloaded once and cached.

use chromiumoxide::{
    browser::{Browser, BrowserConfig},
    fetcher::{BrowserFetcher, BrowserFetcherOptions},
    Element, Page,
};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Window size the site is scraped at.
const VIEWPORT_WIDTH: u32 = 1920;
const VIEWPORT_HEIGHT: u32 = 1080;

/// How often [`ForumSession::wait_for_element`] re-queries the DOM.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Upper bound on a single page navigation.
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("browser operation failed: {0}")]
    OperationFailed(String),
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        BrowserError::OperationFailed(e.to_string())
    }
}

/// The live browser plus the task pumping its CDP event loop.
pub struct ForumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
}

impl ForumSession {
    /// Directory where the fetcher caches downloaded Chrome binaries.
    fn fetcher_cache_dir() -> PathBuf {
        let base = std::env::var("HOME").map_or_else(|_| PathBuf::from("/tmp"), PathBuf::from);
        base.join(".cache/orbisweep/chromium")
    }

    fn browser_config(headless: bool, executable: Option<&Path>) -> Result<BrowserConfig, BrowserError> {
        let user_data_dir = format!("/tmp/orbisweep-chrome-{}", std::process::id());

        // Remove a stale profile dir so Chrome's SingletonLock from a
        // crashed run can't block the launch.
        let _ = std::fs::remove_dir_all(&user_data_dir);

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .user_data_dir(&user_data_dir)
            .viewport(chromiumoxide::handler::viewport::Viewport {
                width: VIEWPORT_WIDTH,
                height: VIEWPORT_HEIGHT,
                device_scale_factor: Some(1.0),
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            });

        builder = if headless {
            builder.new_headless_mode()
        } else {
            builder.with_head()
        };

        if let Some(path) = executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(BrowserError::LaunchFailed)
    }

    async fn launch_and_init(headless: bool, executable: Option<&Path>) -> Result<Self, BrowserError> {
        let config = Self::browser_config(headless, executable)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::warn!("CDP handler error: {e}");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        Ok(Self {
            browser,
            handler_task,
            page,
        })
    }

    /// Launch a browser session.
    ///
    /// Tries system Chrome first (zero download). On failure, downloads a
    /// compatible Chromium via `BrowserFetcher` and caches it for future runs.
    pub async fn launch(headless: bool) -> Result<Self, BrowserError> {
        match Self::launch_and_init(headless, None).await {
            Ok(session) => return Ok(session),
            Err(e) => {
                tracing::info!("System Chrome not available ({e}), trying fetcher...");
            }
        }

        let cache_dir = Self::fetcher_cache_dir();
        tracing::info!("Downloading Chrome to {cache_dir:?} (first run only)...");

        std::fs::create_dir_all(&cache_dir).map_err(|e| {
            BrowserError::LaunchFailed(format!(
                "Failed to create cache dir {}: {e}",
                cache_dir.display()
            ))
        })?;

        let fetcher_opts = BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .map_err(|e| BrowserError::LaunchFailed(format!("Fetcher config error: {e}")))?;

        let fetcher = BrowserFetcher::new(fetcher_opts);
        let info = fetcher
            .fetch()
            .await
            .map_err(|e| BrowserError::LaunchFailed(format!("Chrome download failed: {e:#}")))?;

        tracing::info!("Using Chrome at {:?}", info.executable_path);

        Self::launch_and_init(headless, Some(&info.executable_path)).await
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate the page and wait for the load to settle, bounded by
    /// [`NAVIGATION_TIMEOUT`].
    pub async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        match tokio::time::timeout(NAVIGATION_TIMEOUT, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::OperationFailed(format!(
                "navigation to {url} failed: {e}"
            ))),
            Err(_) => Err(BrowserError::OperationFailed(format!(
                "timed out after {NAVIGATION_TIMEOUT:?} loading {url}"
            ))),
        }
    }

    /// Poll for `selector` until it resolves or `timeout` elapses. Absence is
    /// an expected outcome for the callers, so it comes back as `None` (with
    /// an error log) rather than an `Err`.
    pub async fn wait_for_element(&self, selector: &str, timeout: Duration) -> Option<Element> {
        let found = tokio::time::timeout(timeout, async {
            loop {
                match self.page.find_element(selector).await {
                    Ok(element) => return element,
                    Err(_) => tokio::time::sleep(POLL_INTERVAL).await,
                }
            }
        })
        .await;

        match found {
            Ok(element) => Some(element),
            Err(_) => {
                tracing::error!(selector, ?timeout, "element not found within timeout");
                None
            }
        }
    }

    /// Close the browser and wait for its event loop to drain.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("browser close failed: {e}");
        }
        if let Err(e) = self.handler_task.await {
            tracing::debug!("handler task join failed: {e}");
        }
    }
}
