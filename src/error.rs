use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a run. Field absence inside a bib mapping is
/// not represented here; it is absorbed by default substitution during
/// normalization.
#[derive(Debug, Error)]
pub enum Error {
    /// The author id could not be resolved to a Scholar profile.
    #[error("no Google Scholar profile found for author id {0:?}")]
    Lookup(String),

    #[error("request to Google Scholar failed")]
    Http(#[from] reqwest::Error),

    /// A raw record or page is missing structure beyond the tolerated
    /// optional fields (e.g. the bib mapping itself is absent).
    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize publications")]
    Serialize(#[from] serde_json::Error),
}
