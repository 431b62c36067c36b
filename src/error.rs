// src/error.rs
//! Diagnostics shared by every stage of the pipeline.
//!
//! Only the first problem in a source file is ever reported; each variant
//! carries enough context (line, expected construct, offending text) to find it.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CompileError {
    #[snafu(display("LEXICAL ERROR: {message} || Line: {line}"))]
    Lexical { message: String, line: usize },

    #[snafu(display("PARSE ERROR || Expected: {expected} || Given: {given} || Line: {line}"))]
    Parse {
        expected: String,
        given: String,
        line: usize,
    },

    #[snafu(display("SEMANTIC ERROR: {message} || Line: {line}"))]
    Semantic { message: String, line: usize },

    #[snafu(display("failed to write generated code: {source}"))]
    Emit { source: std::io::Error },
}

impl CompileError {
    /// Line the diagnostic points at, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::Lexical { line, .. }
            | CompileError::Parse { line, .. }
            | CompileError::Semantic { line, .. } => Some(*line),
            CompileError::Emit { .. } => None,
        }
    }

    /// Pipeline stage the driver names after the diagnostic.
    pub fn stage(&self) -> &'static str {
        match self {
            CompileError::Lexical { .. } | CompileError::Parse { .. } => "Parse Failure",
            CompileError::Semantic { .. } => "Static Semantics Failure",
            CompileError::Emit { .. } => "Code Generation Failure",
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, CompileError::Lexical { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, CompileError::Parse { .. })
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, CompileError::Semantic { .. })
    }
}
