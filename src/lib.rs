//! # page-snapshot
//!
//! Compact, agent-readable snapshots of rendered web pages.
//!
//! A snapshot keeps only what a user can perceive, collapses wrapper structure,
//! tags every remaining node with a numeric reference and maps each reference back
//! to a live document node, so an agent can say "click ref 12" without writing selectors.
//!
//! ## Features
//!
//! - **Snapshot Builder**: visibility filtering, wrapper collapse and inline-run folding
//! - **Serializers**: structured JSON items and an indented text rendering
//! - **Highlight Overlay**: numbered boxes drawn into the page or onto a screenshot
//! - **Browser Session**: capture a live Chrome/Chromium page via headless_chrome
//!
//! ## Command Line
//!
//! ```bash
//! # Print the text rendering of a page
//! cargo run --bin page-snapshot -- https://example.com
//!
//! # Structured JSON, plus an annotated screenshot
//! cargo run --bin page-snapshot -- https://example.com --json --screenshot page.png
//! ```
//!
//! ## Library Usage
//!
//! ### Snapshot of a live page
//!
//! ```rust,no_run
//! use page_snapshot::{BrowserSession, LaunchOptions, RenderOptions, SnapshotOptions};
//!
//! # fn main() -> page_snapshot::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://example.com")?;
//! session.wait_for_navigation()?;
//!
//! let page = session.snapshot(&SnapshotOptions::default())?;
//! println!("{}", page.render(&RenderOptions::default()));
//!
//! // Draw numbered boxes over the page
//! session.highlight(&page)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Snapshot of a hand-built document
//!
//! ```rust
//! use page_snapshot::{CapturedDocument, ElementNode, RenderOptions, SnapshotOptions};
//! use page_snapshot::{create_snapshot, render_snapshot};
//!
//! # fn main() -> page_snapshot::Result<()> {
//! let doc = CapturedDocument::from_tree(
//!     ElementNode::new("div")
//!         .with_bounding_box(0.0, 0.0, 200.0, 20.0)
//!         .with_child(
//!             ElementNode::new("a")
//!                 .with_bounding_box(0.0, 0.0, 200.0, 20.0)
//!                 .with_href("/x")
//!                 .with_text("Click"),
//!         ),
//! );
//!
//! let output = create_snapshot(&doc, doc.root(), &SnapshotOptions::default())?;
//! assert_eq!(render_snapshot(&output.snapshot, &RenderOptions::default()), "a[ref=1](/x) Click");
//! assert_eq!(output.lookup_table.get(1), doc.find_by_tag("a"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: Rendered document model and page capture
//! - [`snapshot`]: Visibility, text normalization, snapshot tree and references
//! - [`render`]: Indented-text rendering
//! - [`highlight`]: Visual grounding overlay
//! - [`ancestry`]: Ancestor HTML capture for debugging
//! - [`browser`]: Browser session management and configuration
//! - [`error`]: Error types and result aliases

pub mod ancestry;
pub mod browser;
pub mod dom;
pub mod error;
pub mod highlight;
pub mod render;
pub mod snapshot;

pub use ancestry::{capture_ancestor_html, capture_html_line};
pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions, PageSnapshot};
pub use dom::{BoundingBox, CapturedDocument, ElementNode, NodeId, NodeKind, RenderedDocument};
pub use error::{Result, SnapshotError};
pub use highlight::{OverlayLayer, ScreenshotOverlay, TabOverlay, highlight_snapshot, remove_highlight};
pub use render::{RenderOptions, render_snapshot};
pub use snapshot::{LookupTable, SnapshotItem, SnapshotOptions, SnapshotOutput, create_snapshot};
