//! page-snapshot CLI
//!
//! Loads a URL in Chrome/Chromium and prints its snapshot, either as indented text
//! or as structured JSON. Optionally highlights the page and saves an annotated screenshot.

use anyhow::Context;
use clap::Parser;
use page_snapshot::browser::{ConnectionOptions, LaunchOptions};
use page_snapshot::{BrowserSession, RenderOptions, SnapshotOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "page-snapshot")]
#[command(version)]
#[command(about = "Print an agent-readable snapshot of a web page", long_about = None)]
struct Cli {
    /// Page to load
    url: String,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// WebSocket endpoint URL for remote browser connection
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Print the structured snapshot as JSON instead of text
    #[arg(long)]
    json: bool,

    /// References start after this value
    #[arg(long, default_value = "0")]
    start_id: u32,

    /// Do not force-keep elements containing images
    #[arg(long)]
    skip_images: bool,

    /// Do not force-keep elements containing iframes
    #[arg(long)]
    skip_iframes: bool,

    /// Keep inline runs expanded
    #[arg(long)]
    no_collapse_inline: bool,

    /// Append class names to text lines
    #[arg(long)]
    include_class_list: bool,

    /// Omit text lines for nodes starting below this offset
    #[arg(long, value_name = "PX")]
    max_height: Option<f64>,

    /// Leave the highlight overlay drawn in the page
    #[arg(long)]
    highlight: bool,

    /// Save an annotated screenshot to this file
    #[arg(long, value_name = "FILE")]
    screenshot: Option<PathBuf>,

    /// TrueType/OpenType font used for screenshot labels
    #[arg(long, value_name = "FILE", requires = "screenshot")]
    font: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let session = match cli.ws_endpoint {
        Some(ref endpoint) => {
            eprintln!("WebSocket endpoint: {}", endpoint);
            BrowserSession::connect(ConnectionOptions::new(endpoint.clone()))?
        }
        None => {
            let mut options = LaunchOptions::new().headless(!cli.headed);
            if let Some(ref path) = cli.executable_path {
                eprintln!("Browser executable: {}", path.display());
                options = options.chrome_path(path.clone());
            }
            BrowserSession::launch(options)?
        }
    };

    session.navigate(&cli.url)?;
    session.wait_for_navigation()?;

    let options = SnapshotOptions::new()
        .start_id(cli.start_id)
        .skip_images(cli.skip_images)
        .skip_iframes(cli.skip_iframes)
        .collapse_inline(!cli.no_collapse_inline);
    let page = session.snapshot(&options)?;
    log::info!(
        "Snapshot of {}: {} nodes, max ref {}",
        page.document.url(),
        page.output.lookup_table.len(),
        page.output.max_id
    );

    if cli.json {
        println!("{}", page.output.snapshot.to_json()?);
    } else {
        let mut render_options = RenderOptions::new().include_class_list(cli.include_class_list);
        if let Some(max_height) = cli.max_height {
            render_options = render_options.max_height(max_height);
        }
        println!("{}", page.render(&render_options));
    }

    if let Some(ref path) = cli.screenshot {
        let font = match cli.font {
            Some(ref font_path) => Some(
                std::fs::read(font_path).with_context(|| format!("Failed to read font {}", font_path.display()))?,
            ),
            None => None,
        };
        let overlay = session.annotated_screenshot(&page, font)?;
        std::fs::write(path, overlay.to_png()?)
            .with_context(|| format!("Failed to write screenshot {}", path.display()))?;
        eprintln!("Screenshot saved to {}", path.display());
    }

    if cli.highlight {
        let boxes = session.highlight(&page)?;
        eprintln!("Highlighted {} nodes", boxes);
    }

    Ok(())
}
