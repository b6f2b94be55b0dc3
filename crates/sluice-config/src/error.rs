use sluice_content::TreeError;

/// Errors from configuration resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Resolving an inheritance chain before the tree is fully loaded is a
    /// programming error: correctness depends on complete parent links.
    #[error("cannot resolve inheritance chains until the content tree is ready")]
    TreeNotReady,
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}
