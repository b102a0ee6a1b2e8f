use std::fmt;

/// Non-fatal observations made while initializing a branch.
/// These are optional inputs that were absent; the run still succeeds.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The stale directory was not present, so nothing was removed
    StaleDirectoryAbsent { path: String },
    /// The workflow file has no `kibot_variant: CHECKED` to rewrite
    MarkerNotFound { file: String },
    /// The commit template does not exist; the placeholder signer was used
    SignOffTemplateMissing { path: String },
    /// The commit template has no `Signed-off-by:` line; the placeholder signer was used
    SignOffLineMissing { path: String },
}

impl Notice {
    /// Whether the operator should treat this as a warning rather than plain info.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Notice::SignOffTemplateMissing { .. } | Notice::SignOffLineMissing { .. }
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::StaleDirectoryAbsent { path } => {
                write!(f, "Directory '{}' not found, nothing to remove", path)
            }
            Notice::MarkerNotFound { file } => {
                write!(
                    f,
                    "No 'kibot_variant: CHECKED' in '{}', no changes made",
                    file
                )
            }
            Notice::SignOffTemplateMissing { path } => {
                write!(
                    f,
                    "Commit template '{}' not found, using placeholder signer",
                    path
                )
            }
            Notice::SignOffLineMissing { path } => {
                write!(
                    f,
                    "No 'Signed-off-by:' line in '{}', using placeholder signer",
                    path
                )
            }
        }
    }
}
