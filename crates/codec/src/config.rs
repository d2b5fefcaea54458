//! Codec limits and output options, read from the environment.

/// Default ceiling on an encoded document, in bytes.
pub const DEFAULT_MAX_DOC_BYTES: usize = 1_000_000;
/// Default ceiling on JSON nodes (objects, arrays and scalars) per document.
pub const DEFAULT_MAX_DOC_NODES: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    pub max_bytes: usize,
    pub max_nodes: usize,
    /// Indented JSON output. YAML output is unaffected.
    pub pretty: bool,
}

impl Default for CodecConfig {
    fn default() -> Self { Self { max_bytes: DEFAULT_MAX_DOC_BYTES, max_nodes: DEFAULT_MAX_DOC_NODES, pretty: false } }
}

impl CodecConfig {
    /// `KSHAPE_MAX_DOC_BYTES`, `KSHAPE_MAX_DOC_NODES`, `KSHAPE_PRETTY`. Unset or
    /// unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self { max_bytes: max_doc_bytes(), max_nodes: max_doc_nodes(), pretty: pretty_output() }
    }

    pub fn with_max_bytes(mut self, n: usize) -> Self {
        self.max_bytes = n;
        self
    }

    pub fn with_max_nodes(mut self, n: usize) -> Self {
        self.max_nodes = n;
        self
    }

    pub fn with_pretty(mut self, on: bool) -> Self {
        self.pretty = on;
        self
    }
}

fn max_doc_bytes() -> usize {
    std::env::var("KSHAPE_MAX_DOC_BYTES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_DOC_BYTES)
}

fn max_doc_nodes() -> usize {
    std::env::var("KSHAPE_MAX_DOC_NODES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_DOC_NODES)
}

fn pretty_output() -> bool {
    std::env::var("KSHAPE_PRETTY")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
