use crate::browser::config::{ConnectionOptions, LaunchOptions};
use crate::dom::{CAPTURE_SCRIPT, CapturedDocument, NodeId};
use crate::error::{Result, SnapshotError};
use crate::highlight::{ScreenshotOverlay, TabOverlay, highlight_snapshot, remove_highlight};
use crate::render::{RenderOptions, render_snapshot};
use crate::snapshot::{SnapshotOptions, SnapshotOutput, create_snapshot};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// A captured page together with the snapshot built from it
#[derive(Debug)]
pub struct PageSnapshot {
    pub document: CapturedDocument,
    pub output: SnapshotOutput<NodeId>,
}

impl PageSnapshot {
    /// Indented-text rendering of the snapshot
    pub fn render(&self, options: &RenderOptions) -> String {
        render_snapshot(&self.output.snapshot, options)
    }
}

/// Browser session that manages a Chrome/Chromium instance
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Keep the browser alive between snapshots (default idle timeout is 30 seconds)
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| SnapshotError::LaunchFailed(e.to_string()))?;

        browser
            .new_tab()
            .map_err(|e| SnapshotError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect_with_timeout(options.ws_url, Duration::from_millis(options.timeout))
            .map_err(|e| SnapshotError::ConnectionFailed(e.to_string()))?;

        Ok(Self { browser })
    }

    /// Launch a browser with default options
    pub fn new() -> Result<Self> {
        Self::launch(LaunchOptions::default())
    }

    /// Get the active tab
    pub fn tab(&self) -> Result<Arc<Tab>> {
        self.get_active_tab()
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| SnapshotError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the currently active tab by checking the document visibility and focus state
    pub fn get_active_tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        // Visible and focused is the strongest signal, visible alone the fallback
        for probe in [
            "document.visibilityState === 'visible' && document.hasFocus()",
            "document.visibilityState === 'visible'",
        ] {
            for tab in &tabs {
                match tab.evaluate(probe, false) {
                    Ok(remote_object) => {
                        if remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                    Err(e) => {
                        log::debug!("Failed to check tab status: {}", e);
                    }
                }
            }
        }

        tabs.into_iter()
            .next()
            .ok_or_else(|| SnapshotError::TabOperationFailed("No active tab found".to_string()))
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate to a URL using the active tab
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab()?
            .navigate_to(url)
            .map_err(|e| SnapshotError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        Ok(())
    }

    /// Wait for navigation to complete
    pub fn wait_for_navigation(&self) -> Result<()> {
        self.tab()?
            .wait_until_navigated()
            .map_err(|e| SnapshotError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Capture the rendered page of the active tab
    pub fn capture_document(&self) -> Result<CapturedDocument> {
        let result = self
            .tab()?
            .evaluate(CAPTURE_SCRIPT, false)
            .map_err(|e| SnapshotError::EvaluationFailed(format!("Failed to execute capture script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| SnapshotError::CaptureParseFailed("No value returned from capture script".to_string()))?;

        // The script returns a JSON string, so it is decoded as a string first
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| SnapshotError::CaptureParseFailed(format!("Failed to get JSON string: {}", e)))?;

        let document = CapturedDocument::from_json(&json_str)?;
        log::debug!("Captured {} nodes from {}", document.len(), document.url());
        Ok(document)
    }

    /// Capture the active tab and build its snapshot
    pub fn snapshot(&self, options: &SnapshotOptions) -> Result<PageSnapshot> {
        let document = self.capture_document()?;
        let output = create_snapshot(&document, document.root(), options)?;
        Ok(PageSnapshot { document, output })
    }

    /// Draw the highlight overlay for `page` into the active tab
    pub fn highlight(&self, page: &PageSnapshot) -> Result<usize> {
        let mut layer = TabOverlay::new(self.tab()?);
        highlight_snapshot(&mut layer, &page.document, &page.output.snapshot, &page.output.lookup_table)
    }

    /// Remove the highlight overlay from the active tab
    pub fn remove_highlight(&self) -> Result<()> {
        let mut layer = TabOverlay::new(self.tab()?);
        remove_highlight::<NodeId, _>(&mut layer)
    }

    /// Screenshot of the active tab with the overlay for `page` painted on it
    pub fn annotated_screenshot(&self, page: &PageSnapshot, font: Option<Vec<u8>>) -> Result<ScreenshotOverlay<'static>> {
        let tab = self.tab()?;
        let png = tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| SnapshotError::ScreenshotFailed(e.to_string()))?;

        let scale = tab
            .evaluate("window.devicePixelRatio", false)
            .map_err(|e| SnapshotError::EvaluationFailed(e.to_string()))?
            .value
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);

        let mut overlay = ScreenshotOverlay::from_encoded(&png)?.with_scale(scale);
        if let Some(bytes) = font {
            overlay = overlay.with_font_bytes(bytes)?;
        }
        highlight_snapshot(&mut overlay, &page.document, &page.output.snapshot, &page.output.lookup_table)?;
        Ok(overlay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;

    #[test]
    fn test_launch_options_builder() {
        let opts = LaunchOptions::new().headless(true).window_size(800, 600);

        assert!(opts.headless);
        assert_eq!(opts.window_width, 800);
        assert_eq!(opts.window_height, 600);
    }

    #[test]
    fn test_connection_options() {
        let opts = ConnectionOptions::new("ws://localhost:9222").timeout(5000);

        assert_eq!(opts.ws_url, "ws://localhost:9222");
        assert_eq!(opts.timeout, 5000);
    }

    #[test]
    fn test_page_snapshot_render() {
        let document = CapturedDocument::from_tree(
            ElementNode::new("body")
                .with_bounding_box(0.0, 0.0, 800.0, 600.0)
                .with_child(ElementNode::new("button").with_bounding_box(0.0, 0.0, 80.0, 20.0).with_text("OK")),
        );
        let output = create_snapshot(&document, document.root(), &SnapshotOptions::default()).unwrap();
        let page = PageSnapshot { document, output };

        assert_eq!(page.render(&RenderOptions::default()), "button[ref=1] OK");
    }

    // Integration tests (require Chrome to be installed)
    #[test]
    #[ignore] // Ignore by default, run with: cargo test -- --ignored
    fn test_launch_browser() {
        let result = BrowserSession::launch(LaunchOptions::new().headless(true));
        assert!(result.is_ok());
    }

    #[test]
    #[ignore]
    fn test_get_active_tab() {
        let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");

        let tab = session.get_active_tab();
        assert!(tab.is_ok());
    }
}
