use expression::ExpressionType;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameKind {
    Class,
    Method,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Class => write!(f, "class"),
            NameKind::Method => write!(f, "method"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidNameReason {
    Null,
    Blank,
    InvalidIdentifier(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Unable to translate {node_type:?} expression '{description}': no translation is available")]
    UnsupportedExpression {
        node_type: ExpressionType,
        description: String,
    },

    #[error("{}", invalid_name_message(.kind, .reason))]
    InvalidName {
        kind: NameKind,
        reason: InvalidNameReason,
    },

    #[error("Invalid method sequence: {0}")]
    InvalidMethodSequence(String),
}

fn invalid_name_message(kind: &NameKind, reason: &InvalidNameReason) -> String {
    let capitalised = match kind {
        NameKind::Class => "Class",
        NameKind::Method => "Method",
    };
    match reason {
        InvalidNameReason::Null => format!("{} name cannot be null", capitalised),
        InvalidNameReason::Blank => format!("{} name cannot be blank", capitalised),
        InvalidNameReason::InvalidIdentifier(name) => format!("'{}' is an invalid {} name", name, kind),
    }
}

/// One error reported by a downstream compiler.
#[derive(Clone, Constructor, Debug, PartialEq, Eq)]
pub struct CompilationError {
    pub code: String,
    pub message: String,
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Every error a downstream compiler reported for one source listing.
#[derive(Clone, Constructor, Debug, Error, PartialEq, Eq)]
#[error("Compilation failed with {} error(s):\n{}", .errors.len(), format_errors(.errors))]
pub struct CompilationFailure {
    pub errors: Vec<CompilationError>,
}

fn format_errors(errors: &[CompilationError]) -> String {
    errors.iter()
        .map(|e| e.to_string())
        .collect::<Vec<String>>()
        .join("\n")
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error(transparent)]
    Compilation(#[from] CompilationFailure),
}
