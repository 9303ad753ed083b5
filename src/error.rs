use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AnnotError {
    #[error("unknown output-format field: {0}")]
    UnknownField(String),

    #[error("output format declares {expected} columns but row has {found}")]
    SchemaMismatch { expected: usize, found: usize },

    #[error("invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("could not infer uniref tier from path: {0}")]
    TierInference(String),

    #[error("the specified path is missing: {0}")]
    MissingPath(Utf8PathBuf),

    #[error("required tool not found: {0}")]
    MissingTool(String),

    #[error("search command failed: {0}")]
    Search(String),

    #[error("header on line {0} lacks annotation fields")]
    MalformedHeader(u64),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
