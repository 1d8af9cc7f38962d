//! Tracing configuration for debugging binding and resolution.
//!
//! Supports three output formats controlled by `TSB_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`, which follows
//!   the nesting of `add_unit` / `resolve_symbol` spans
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Follow a lazy resolution chain
//! TSB_LOG=tsb_binder::resolver=trace TSB_LOG_FORMAT=tree cargo test test_class_extends
//!
//! # Unit attach/detach and invalidation only
//! TSB_LOG=tsb_binder::session=debug cargo test
//! ```
//!
//! The subscriber is only initialised when `TSB_LOG` (or `RUST_LOG`) is set,
//! so there is zero overhead in normal use.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name. Unknown names fall back to `Text`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Read `TSB_LOG_FORMAT`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("TSB_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `TSB_LOG`, falling back to `RUST_LOG`.
///
/// `TSB_LOG` takes precedence when both are set. Values use the same
/// syntax as `RUST_LOG` (e.g. `debug`, `tsb_binder::resolver=trace`).
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("TSB_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `TSB_LOG` nor `RUST_LOG` is set. Returns
/// whether a subscriber was installed by this call; a second call (or a
/// host that already installed one) leaves the existing subscriber alone.
///
/// All output goes to stderr.
pub fn init_tracing() -> bool {
    let has_tsb_log = std::env::var("TSB_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_tsb_log && !has_rust_log {
        return false;
    }

    let filter = build_filter();
    let format = LogFormat::from_env();
    let installed = match format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).try_init().is_ok()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).try_init().is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };
    if installed {
        tracing::debug!(?format, "tracing initialised");
    }
    installed
}
