use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tags dropped from the snapshot unless an always-keep rule applies
pub const DEFAULT_SKIP_TAGS: &[&str] = &["svg", "script", "noscript", "style", "link", "meta"];

/// Semantically important tags, most important first
pub const DEFAULT_TAG_PREFERENCE: &[&str] = &[
    "a", "button", "label", "section",
    "article", "main", "header", "footer", "nav", "aside",
    "h1", "h2", "h3", "h4", "h5", "h6",
    "ul", "ol", "li", "dl", "dt", "dd",
    "p", "pre", "code", "blockquote", "figure", "figcaption",
    "table", "thead", "tbody", "tr", "td", "th",
    "form", "input", "textarea", "select", "option", "fieldset", "legend",
    "strong", "em", "sub", "sup",
];

/// Elements kept regardless of visibility, skip tags and empty text
pub const DEFAULT_KEEP_TAGS: &[&str] = &["input"];

pub const DEFAULT_OPACITY_THRESHOLD: f64 = 0.1;

pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Which style signals count as "hidden"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VisibilityOptions {
    /// Treat nearly transparent elements as hidden
    pub check_opacity: bool,

    /// Treat `visibility: hidden` as hidden
    pub check_visibility: bool,

    /// Treat zero-scale transforms as hidden
    pub check_transform: bool,

    /// Elements with opacity strictly below this value are hidden
    pub opacity_threshold: f64,
}

/// Options controlling how a snapshot is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotOptions {
    /// References start after this value (first node gets `start_id + 1`)
    pub start_id: u32,

    /// Drop elements that are hidden together with their whole subtree
    pub skip_hidden: bool,

    /// Drop nodes without any non-whitespace text
    pub skip_empty_text: bool,

    /// Do not force-keep elements containing images
    pub skip_images: bool,

    /// Do not force-keep elements containing iframes
    pub skip_iframes: bool,

    /// Fold containers whose whole subtree is inline into a single leaf
    pub collapse_inline: bool,

    /// Tags never emitted unless force-kept
    pub skip_tags: Vec<String>,

    /// Tag ranking used when collapsing single-child wrappers
    pub tag_preference: Vec<String>,

    /// Elements containing one of these tags are always kept
    pub keep_tags: Vec<String>,

    pub visibility: VisibilityOptions,

    /// Nesting ceiling; nodes reaching it become truncated leaves
    pub max_depth: usize,
}

fn to_strings(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|tag| tag.to_string()).collect()
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            check_opacity: true,
            check_visibility: true,
            check_transform: true,
            opacity_threshold: DEFAULT_OPACITY_THRESHOLD,
        }
    }
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            start_id: 0,
            skip_hidden: true,
            skip_empty_text: true,
            skip_images: false,
            skip_iframes: false,
            collapse_inline: true,
            skip_tags: to_strings(DEFAULT_SKIP_TAGS),
            tag_preference: to_strings(DEFAULT_TAG_PREFERENCE),
            keep_tags: to_strings(DEFAULT_KEEP_TAGS),
            visibility: VisibilityOptions::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SnapshotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_id(mut self, start_id: u32) -> Self {
        self.start_id = start_id;
        self
    }

    pub fn skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    pub fn skip_empty_text(mut self, skip: bool) -> Self {
        self.skip_empty_text = skip;
        self
    }

    pub fn skip_images(mut self, skip: bool) -> Self {
        self.skip_images = skip;
        self
    }

    pub fn skip_iframes(mut self, skip: bool) -> Self {
        self.skip_iframes = skip;
        self
    }

    pub fn collapse_inline(mut self, collapse: bool) -> Self {
        self.collapse_inline = collapse;
        self
    }

    pub fn skip_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn tag_preference<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_preference = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method: tags kept regardless of visibility, skip tags and empty text
    pub fn keep_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn visibility(mut self, visibility: VisibilityOptions) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Position of `tag` in the preference list (lower is more important)
    pub fn tag_rank(&self, tag: &str) -> Option<usize> {
        self.tag_preference.iter().position(|t| t == tag)
    }

    pub fn is_skipped_tag(&self, tag: &str) -> bool {
        self.skip_tags.iter().any(|t| t == tag)
    }

    /// Tags whose presence in a subtree forces the subtree to be kept
    pub fn always_keep_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.keep_tags.iter().map(String::as_str).collect();
        if !self.skip_iframes {
            tags.push("iframe");
        }
        if !self.skip_images {
            tags.push("img");
        }
        tags
    }
}
