//! Gitignore-style exclusion rules for directory scanning.
//!
//! # Overview
//!
//! This module provides [`IgnoreRuleSet`], which loads a plain-text rule
//! file from the scan root and decides whether a given path is excluded
//! from scanning. The grammar is a reduced gitignore dialect:
//!
//! - `/dir/` — root-anchored directory rule
//! - `dir/` — directory rule at any depth prefix
//! - `/prefix` — anchored prefix match
//! - `*.ext`, `prefix*`, `pre*fix` — single-wildcard forms
//! - anything else — exact relative path or basename match
//!
//! Wildcard shapes outside the three supported forms never match.
//! Matching is always performed against the path made relative to the
//! scan root, with separators normalized to `/`.
//!
//! # Example
//!
//! ```no_run
//! use redup::scanner::IgnoreRuleSet;
//! use std::path::Path;
//!
//! let rules = IgnoreRuleSet::load(Path::new("/project")).unwrap();
//! if rules.should_ignore(Path::new("/project/build/out.o"), Path::new("/project")) {
//!     println!("excluded from scan");
//! }
//! ```

use std::fs;
use std::io;
use std::path::Path;

/// Name of the rule file read from the scan root.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// A set of gitignore-style exclusion rules.
///
/// Rules are stored as the raw trimmed lines of the rule file; matching
/// semantics are applied per rule in [`IgnoreRuleSet::should_ignore`].
#[derive(Debug, Clone, Default)]
pub struct IgnoreRuleSet {
    rules: Vec<String>,
}

impl IgnoreRuleSet {
    /// Create an empty rule set that ignores nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the rule file from `root`.
    ///
    /// A missing rule file is not an error and yields an empty set.
    /// Blank lines and lines starting with `#` are skipped; every other
    /// trimmed line becomes one rule.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the rule file exists but cannot be read.
    pub fn load(root: &Path) -> io::Result<Self> {
        let path = root.join(IGNORE_FILE_NAME);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No {} at {}", IGNORE_FILE_NAME, root.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        let rules: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(ToOwned::to_owned)
            .collect();

        log::debug!(
            "Loaded {} ignore rule(s) from {}",
            rules.len(),
            path.display()
        );

        Ok(Self { rules })
    }

    /// Number of loaded rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the rule set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The loaded rules, for debugging and reporting.
    #[must_use]
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Decide whether `path` should be excluded from scanning.
    ///
    /// The path is made relative to `root` and separator-normalized to
    /// `/` before being tested against every rule; the first matching
    /// rule excludes the path. A path outside `root` (which cannot be
    /// relativized) is never ignored.
    #[must_use]
    pub fn should_ignore(&self, path: &Path, root: &Path) -> bool {
        if self.rules.is_empty() {
            return false;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };

        let rel_str = relative.to_string_lossy();
        let normalized = if cfg!(windows) {
            rel_str.replace('\\', "/")
        } else {
            rel_str.into_owned()
        };

        self.rules
            .iter()
            .any(|rule| matches_rule(&normalized, rule))
    }
}

/// Test one normalized relative path against one rule.
fn matches_rule(path: &str, rule: &str) -> bool {
    // Wrapped in slashes: a directory anchored at the root.
    if rule.starts_with('/') && rule.ends_with('/') {
        let dir = rule.trim_matches('/');
        return path == dir || path.starts_with(&format!("{dir}/"));
    }

    // Trailing slash: a directory rule.
    if let Some(dir) = rule.strip_suffix('/') {
        return path == dir || path.starts_with(&format!("{dir}/"));
    }

    // Leading slash: anchored to the start of the relative path.
    if let Some(prefix) = rule.strip_prefix('/') {
        return path.starts_with(prefix);
    }

    if rule.contains('*') {
        return matches_wildcard(path, rule);
    }

    // Exact match, or basename match at any depth.
    path == rule || path.ends_with(&format!("/{rule}"))
}

/// Test the supported single-wildcard forms. Unsupported shapes never match.
fn matches_wildcard(path: &str, pattern: &str) -> bool {
    // *.ext — suffix match including the dot.
    if let Some(ext) = pattern.strip_prefix("*.") {
        return path.ends_with(&format!(".{ext}"));
    }

    // prefix* — prefix match.
    if let Some(prefix) = pattern.strip_suffix('*') {
        return path.starts_with(prefix);
    }

    // pre*fix — single interior wildcard.
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 2 {
        return path.starts_with(parts[0]) && path.ends_with(parts[1]);
    }

    false
}
