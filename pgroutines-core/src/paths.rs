//! Filesystem-safe naming for exported routines.
//!
//! Output layout:
//! `<root>/<catalog>/<schema>/<function|procedure>/<name>__<identity_args>.sql`
//!
//! Names are sanitized by [`safe_slug`]; two routines whose slugs coincide
//! map to the same file. [`CollisionTracker`] lets the exporter notice that.

use crate::models::Routine;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Default maximum slug length in characters.
pub const DEFAULT_SLUG_MAX_LEN: usize = 120;

/// Slug returned when sanitizing leaves nothing.
pub const FALLBACK_SLUG: &str = "unknown";

/// File-name fragment used for routines without arguments.
pub const NO_ARGS: &str = "noargs";

/// Pre-compiled slug patterns, built once per process.
struct SlugPatterns {
    whitespace: Regex,
    disallowed: Regex,
}

impl SlugPatterns {
    fn instance() -> &'static Self {
        static PATTERNS: OnceLock<SlugPatterns> = OnceLock::new();
        PATTERNS.get_or_init(Self::compile)
    }

    #[allow(clippy::expect_used)] // literal patterns
    fn compile() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("Invalid whitespace pattern"),
            disallowed: Regex::new(r"[^a-zA-Z0-9_,\-.() ]+").expect("Invalid allow-list pattern"),
        }
    }
}

/// Makes a readable, filesystem-safe fragment out of an arbitrary string.
///
/// Steps, in order: trim; `/` to `_`; collapse whitespace runs to one
/// space; each run of characters outside `[A-Za-z0-9_,-.() ]` to `_`;
/// spaces to `_`; truncate to `max_len` characters and strip the trailing
/// underscores truncation leaves. An empty result becomes `"unknown"`.
///
/// Total over all inputs.
///
/// # Example
/// ```rust
/// use pgroutines_core::paths::safe_slug;
///
/// assert_eq!(safe_slug("integer, integer", 120), "integer,_integer");
/// assert_eq!(safe_slug("weird/name  ☂", 120), "weird_name__");
/// assert_eq!(safe_slug("   ", 120), "unknown");
/// ```
pub fn safe_slug(value: &str, max_len: usize) -> String {
    let patterns = SlugPatterns::instance();

    let value = value.trim().replace('/', "_");
    let value = patterns.whitespace.replace_all(&value, " ");
    let value = patterns.disallowed.replace_all(&value, "_");
    let mut slug = value.replace(' ', "_");

    if slug.chars().count() > max_len {
        slug = slug.chars().take(max_len).collect::<String>();
        let trimmed_len = slug.trim_end_matches('_').len();
        slug.truncate(trimmed_len);
    }

    if slug.is_empty() {
        return FALLBACK_SLUG.to_string();
    }
    slug
}

/// File name for a routine: `<slug(name)>__<slug(identity_args)|noargs>.sql`.
pub fn routine_file_name(routine: &Routine) -> String {
    let name = safe_slug(&routine.name, DEFAULT_SLUG_MAX_LEN);
    let args = if routine.identity_args.is_empty() {
        NO_ARGS.to_string()
    } else {
        safe_slug(&routine.identity_args, DEFAULT_SLUG_MAX_LEN)
    };
    format!("{}__{}.sql", name, args)
}

/// Full output path of a routine under `output_root`.
///
/// Depends only on catalog, schema, kind, name and identity arguments;
/// the oid plays no part.
pub fn build_path(output_root: &Path, routine: &Routine) -> PathBuf {
    output_root
        .join(&routine.catalog)
        .join(&routine.schema)
        .join(routine.kind.as_str())
        .join(routine_file_name(routine))
}

/// Remembers which routine claimed each output path during a run.
#[derive(Debug, Default)]
pub struct CollisionTracker {
    claimed: HashMap<PathBuf, String>,
}

impl CollisionTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `routine` is written to `path`.
    ///
    /// Returns the qualified signature of the routine that previously
    /// claimed the same path, if any. The latest claim wins.
    pub fn claim(&mut self, path: &Path, routine: &Routine) -> Option<String> {
        self.claimed
            .insert(path.to_path_buf(), routine.qualified_signature())
    }
}
