// src/persona/slug.rs
// Slug derivation: lowercase, strip everything outside word characters /
// whitespace / hyphens, collapse whitespace runs and repeated hyphens.
// Collision handling (the numeric suffix) lives in the store, which is
// the only place that can see existing slugs.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("slug pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("slug pattern"));
static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("slug pattern"));

pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = DISALLOWED.replace_all(&lowered, "");
    let hyphenated = WHITESPACE.replace_all(stripped.trim(), "-");
    HYPHEN_RUNS.replace_all(&hyphenated, "-").to_string()
}
