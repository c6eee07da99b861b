use thiserror::Error;
use xml_tree_core::{ParseError, WriteError};

/// Fatal conditions of an export run.
///
/// Every variant ends the run; none are retried.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No `*.tar` file carrying the archive marker in the search directory.
    #[error("no matching .tar archive containing '{marker}' found in {dir}")]
    NoSourceArchive { dir: String, marker: String },
    /// The input archive could not be opened or read.
    #[error("archive error in {path}: {source}")]
    Archive {
        path: String,
        source: std::io::Error,
    },
    /// The input archive holds no `.xml` member.
    #[error("no XML file found in archive {path}")]
    NoXmlMember { path: String },
    /// The XML member is not well-formed.
    #[error("failed to parse {member}: {source}")]
    Xml { member: String, source: ParseError },
    /// Neither IP nor FQDN host groups are present.
    #[error("unknown host schema: neither IP nor FQDN host groups found")]
    UnknownSchema,
    /// The document holds no named groups of the detected schema.
    #[error("no host groups found in the document")]
    EmptyCatalog,
    /// One or more selection tokens could not be resolved.
    #[error("invalid selection: {}", .tokens.join(", "))]
    InvalidSelection { tokens: Vec<String> },
    /// The selection resolved to nothing.
    #[error("no valid groups selected")]
    EmptySelection,
    /// The export name was blank after sanitizing.
    #[error("no export name given")]
    EmptyExportName,
    /// The output document could not be serialized.
    #[error("failed to serialize output document: {0}")]
    Serialize(#[from] WriteError),
    /// The output archive could not be created or written.
    #[error("failed to write output archive {path}: {source}")]
    Output {
        path: String,
        source: std::io::Error,
    },
    /// The operator cancelled the run.
    #[error("export cancelled by user")]
    Interrupted,
}

/// Exit status used when the operator interrupts the run.
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

impl ExportError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExportError::Interrupted => INTERRUPTED_EXIT_CODE,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ExportError;

    #[test]
    fn invalid_selection_lists_every_token() {
        let err = ExportError::InvalidSelection {
            tokens: vec!["5".to_string(), "zzz".to_string()],
        };
        assert_eq!(err.to_string(), "invalid selection: 5, zzz");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn interruption_has_distinct_exit_code() {
        assert_eq!(ExportError::Interrupted.exit_code(), 130);
        assert_ne!(
            ExportError::Interrupted.exit_code(),
            ExportError::EmptyCatalog.exit_code()
        );
    }
}
