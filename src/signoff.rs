//! Commit message composition.

use regex::Regex;

use crate::version::VersionTag;

/// Signer used when the template cannot provide one.
pub const FALLBACK_SIGN_OFF: &str = "Signed-off-by: Unknown <unknown@example.com>";

/// Why the fallback signer was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOffSource {
    Template,
    TemplateMissing,
    LineMissing,
}

/// A resolved `Signed-off-by:` line and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOff {
    pub line: String,
    pub source: SignOffSource,
}

impl SignOff {
    /// Resolves the sign-off from the commit template contents.
    ///
    /// `None` means the template file does not exist. The first line starting
    /// with `Signed-off-by:` and carrying a non-empty value wins. The line is
    /// kept as written, minus trailing whitespace and `\r`.
    pub fn from_template(template: Option<&str>) -> Self {
        let Some(text) = template else {
            return SignOff::fallback(SignOffSource::TemplateMissing);
        };

        let line = Regex::new(r"(?m)^Signed-off-by:[ \t]*\S.*$")
            .ok()
            .and_then(|re| re.find(text))
            .map(|m| m.as_str().trim_end().to_string());

        match line {
            Some(line) => SignOff {
                line,
                source: SignOffSource::Template,
            },
            None => SignOff::fallback(SignOffSource::LineMissing),
        }
    }

    fn fallback(source: SignOffSource) -> Self {
        SignOff {
            line: FALLBACK_SIGN_OFF.to_string(),
            source,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source != SignOffSource::Template
    }
}

/// Builds the commit message for a freshly initialized development branch.
pub fn commit_message(version: &VersionTag, sign_off: &SignOff) -> String {
    format!(
        "Initialize development branch for version {}\n\n{}",
        version, sign_off.line
    )
}
