//! Error handling for the CLI application

use std::fmt;

/// User-facing failures that are not plain I/O or parse errors
#[derive(Debug)]
pub enum CliError {
    /// The requested vocabulary is not in the glossary
    VocabularyNotFound(String),
    /// The glossary has several vocabularies and none was chosen
    AmbiguousVocabulary(Vec<String>),
    /// Invalid value in a configuration file or on the command line
    ConfigError(String),
    /// Annotating a file failed
    AnnotationError {
        /// File being annotated
        path: String,
        /// Underlying error message
        message: String,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::VocabularyNotFound(id) => write!(f, "Vocabulary not found: {id}"),
            CliError::AmbiguousVocabulary(ids) => write!(
                f,
                "Glossary has several vocabularies, choose one with --vocabulary: {}",
                ids.join(", ")
            ),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::AnnotationError { path, message } => {
                write!(f, "Failed to annotate {path}: {message}")
            }
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_not_found_display() {
        let error = CliError::VocabularyNotFound("recipes".to_string());
        assert_eq!(error.to_string(), "Vocabulary not found: recipes");
    }

    #[test]
    fn test_ambiguous_vocabulary_display() {
        let error = CliError::AmbiguousVocabulary(vec!["a".into(), "b".into()]);
        assert!(error.to_string().ends_with("--vocabulary: a, b"));
    }

    #[test]
    fn test_config_error_display() {
        let error = CliError::ConfigError("unknown output format: xml".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: unknown output format: xml"
        );
    }

    #[test]
    fn test_annotation_error_display() {
        let error = CliError::AnnotationError {
            path: "page.html".into(),
            message: "Input too large".into(),
        };
        assert_eq!(error.to_string(), "Failed to annotate page.html: Input too large");
    }

    #[test]
    fn test_converts_into_anyhow() {
        let result: CliResult<()> = Err(CliError::VocabularyNotFound("x".into()).into());
        let error = result.unwrap_err();
        assert!(error.downcast_ref::<CliError>().is_some());
    }
}
