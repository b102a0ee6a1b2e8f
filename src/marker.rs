//! Build-variant marker rewrite inside the CI workflow file.
//!
//! The workflow selects a KiBot variant through a `kibot_variant:` key. A fresh
//! development branch must build the `PRELIMINARY` variant instead of `CHECKED`.
//! Only that exact token pair is understood; everything else in the file is
//! opaque text and is preserved byte-for-byte.

use regex::Regex;

pub const MARKER_KEY: &str = "kibot_variant:";
pub const CHECKED: &str = "CHECKED";
pub const PRELIMINARY: &str = "PRELIMINARY";

/// Result of scanning workflow content for the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerRewrite {
    /// Every `kibot_variant: CHECKED` was rewritten; carries the new content.
    Rewritten(String),
    /// No `kibot_variant: CHECKED` present; the content needs no change.
    Unchanged,
}

/// What happened to the marker during a run, for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOutcome {
    Rewritten,
    AlreadyMigrated,
}

/// Rewrites every `kibot_variant:<ws>CHECKED` to `kibot_variant:<ws>PRELIMINARY`.
///
/// A workflow with several KiBot jobs carries one marker per job, and all of
/// them move together in a single write. Whitespace between the key and the token is kept as-is. `CHECKED` must be a
/// whole word, so values such as `CHECKED_OLD` are left alone.
pub fn rewrite_marker(content: &str) -> MarkerRewrite {
    let pattern = format!(r"({})(\s*){}\b", regex::escape(MARKER_KEY), CHECKED);

    match Regex::new(&pattern).ok().and_then(|re| {
        re.find(content)
            .map(|_| re.replace_all(content, format!("${{1}}${{2}}{}", PRELIMINARY)))
    }) {
        Some(updated) => MarkerRewrite::Rewritten(updated.into_owned()),
        None => MarkerRewrite::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_checked() {
        let input = "jobs:\n  build:\n    with:\n      kibot_variant: CHECKED\n";
        assert_eq!(
            rewrite_marker(input),
            MarkerRewrite::Rewritten(
                "jobs:\n  build:\n    with:\n      kibot_variant: PRELIMINARY\n".to_string()
            )
        );
    }

    #[test]
    fn test_preserves_whitespace() {
        assert_eq!(
            rewrite_marker("kibot_variant:\t  CHECKED # keep"),
            MarkerRewrite::Rewritten("kibot_variant:\t  PRELIMINARY # keep".to_string())
        );
        assert_eq!(
            rewrite_marker("kibot_variant:CHECKED"),
            MarkerRewrite::Rewritten("kibot_variant:PRELIMINARY".to_string())
        );
    }

    #[test]
    fn test_rewrites_every_job() {
        let input = "  pcb:\n    kibot_variant: CHECKED\n  sch:\n    kibot_variant:\tCHECKED\n";
        assert_eq!(
            rewrite_marker(input),
            MarkerRewrite::Rewritten(
                "  pcb:\n    kibot_variant: PRELIMINARY\n  sch:\n    kibot_variant:\tPRELIMINARY\n"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_already_migrated_is_unchanged() {
        assert_eq!(
            rewrite_marker("kibot_variant: PRELIMINARY\n"),
            MarkerRewrite::Unchanged
        );
    }

    #[test]
    fn test_second_pass_is_unchanged() {
        let first = match rewrite_marker("on: push\nkibot_variant: CHECKED\n") {
            MarkerRewrite::Rewritten(content) => content,
            MarkerRewrite::Unchanged => panic!("first pass should rewrite"),
        };
        assert_eq!(rewrite_marker(&first), MarkerRewrite::Unchanged);
    }

    #[test]
    fn test_ignores_other_keys_and_tokens() {
        assert_eq!(rewrite_marker("variant: CHECKED"), MarkerRewrite::Unchanged);
        assert_eq!(
            rewrite_marker("kibot_variant: CHECKED_OLD"),
            MarkerRewrite::Unchanged
        );
        assert_eq!(rewrite_marker(""), MarkerRewrite::Unchanged);
    }
}
