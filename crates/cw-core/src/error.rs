use miette::Diagnostic;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Lookup failures against a loaded world.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// No item with this id exists in the registry.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// No scene with this id exists.
    #[error("scene not found: {0}")]
    SceneNotFound(String),

    /// No character with this id exists.
    #[error("character not found: {0}")]
    CharacterNotFound(String),
}

/// Errors raised while loading static content.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ContentError {
    /// The document is not valid JSON or does not match the content schema.
    #[error("malformed content: {0}")]
    #[diagnostic(code(castaway::content::parse))]
    Parse(#[from] serde_json::Error),

    /// The document parsed but references are inconsistent.
    #[error("invalid content ({} problem(s)):\n  - {}", .0.len(), .0.join("\n  - "))]
    #[diagnostic(
        code(castaway::content::invalid),
        help("every id referenced by a scene, exit, item, or character must be defined")
    )]
    Invalid(Vec<String>),
}
