use page_snapshot::{BrowserSession, LaunchOptions, RenderOptions, SnapshotOptions, capture_ancestor_html};

fn data_url(html: &str) -> String {
    format!("data:text/html,{}", urlencoding::encode(html))
}

fn open(html: &str) -> BrowserSession {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");
    session.navigate(&data_url(html)).expect("Failed to navigate");
    session.wait_for_navigation().expect("Failed to wait for navigation");
    session
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_capture_live_page() {
    let session = open("<html><head><title>Capture</title></head><body><button id='go'>Go</button></body></html>");

    let doc = session.capture_document().expect("Failed to capture page");

    assert_eq!(doc.title(), "Capture");
    assert!(doc.find_by_id("go").is_some());
}

#[test]
#[ignore]
fn test_snapshot_live_page() {
    let session = open(
        "<html><body>\
         <div><a href='/x'>Click</a></div>\
         <p>Hello <b>World</b></p>\
         <div style='opacity:0'><input name='q'></div>\
         <div style='display:none'>secret</div>\
         </body></html>",
    );

    let page = session.snapshot(&SnapshotOptions::default()).expect("Failed to build snapshot");
    let rendered = page.render(&RenderOptions::default());
    println!("{}", rendered);

    assert!(rendered.contains("Click"));
    assert!(rendered.contains("p[ref="));
    assert!(rendered.contains("Hello World"));
    assert!(rendered.contains("input[ref="));
    assert!(!rendered.contains("secret"));
    assert_eq!(page.output.lookup_table.len(), page.output.snapshot.count_nodes());
}

#[test]
#[ignore]
fn test_highlight_overlay_round_trip() {
    let session = open("<html><body><button>One</button><button>Two</button></body></html>");
    let page = session.snapshot(&SnapshotOptions::default()).expect("Failed to build snapshot");

    let first = session.highlight(&page).expect("Failed to highlight");
    let second = session.highlight(&page).expect("Failed to redraw highlight");
    assert_eq!(first, second);

    let tab = session.tab().unwrap();
    let count = tab
        .evaluate("document.getElementById('page-snapshot-highlight').children.length", false)
        .unwrap()
        .value
        .and_then(|v| v.as_u64())
        .unwrap();
    assert_eq!(count as usize, second);

    session.remove_highlight().expect("Failed to remove highlight");
    let gone = tab
        .evaluate("document.getElementById('page-snapshot-highlight') === null", false)
        .unwrap()
        .value
        .and_then(|v| v.as_bool())
        .unwrap();
    assert!(gone);
}

#[test]
#[ignore]
fn test_annotated_screenshot() {
    let session = open("<html><body><button>Screenshot</button></body></html>");
    let page = session.snapshot(&SnapshotOptions::default()).expect("Failed to build snapshot");

    let overlay = session.annotated_screenshot(&page, None).expect("Failed to take screenshot");

    assert!(overlay.image().width() > 0);
    assert!(!overlay.to_png().unwrap().is_empty());
}

#[test]
#[ignore]
fn test_ancestor_html_of_live_node() {
    let session = open("<html><body><main class='content'><a href='/docs'>Docs</a></main></body></html>");
    let doc = session.capture_document().expect("Failed to capture page");

    let link = doc.find_by_tag("a").unwrap();
    let html = capture_ancestor_html(&doc, link, true).unwrap();

    assert!(html.starts_with("Docs\n"));
    assert!(html.contains(r#"<main class="content">"#));
    assert!(html.ends_with(r#"<a href="/docs">"#));
}
