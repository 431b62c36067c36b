// src/lib.rs
//! Compiler for a small imperative teaching language targeting a textual
//! accumulator-machine assembly.
//!
//! Pipeline: [`lexer`] → [`parser`] → [`semantics`] → [`codegen`].

pub mod codegen;
pub mod dev;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantics;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use log::debug;
use snafu::ResultExt;

pub use error::{CompileError, CompileResult};
pub use parser::{parse, tree::Node};
pub use semantics::{SymbolTable, build_symbol_table};

/// Runs the whole pipeline and returns the generated assembly.
pub fn compile(source: &str) -> CompileResult<String> {
    let tree = parse(source)?;
    let mut table = build_symbol_table(&tree)?;
    let mut buf = Vec::new();
    codegen::generate(&tree, &mut table, &mut buf)?;
    debug!("generated {} bytes of assembly", buf.len());
    String::from_utf8(buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        .context(error::EmitSnafu)
}

/// Like [`compile`], writing to `out` only once compilation has succeeded.
pub fn compile_to<W: Write>(source: &str, mut out: W) -> CompileResult<()> {
    let asm = compile(source)?;
    out.write_all(asm.as_bytes()).context(error::EmitSnafu)?;
    out.flush().context(error::EmitSnafu)
}

/// Extension of the source files the driver reads.
pub const SOURCE_EXTENSION: &str = "4280fs24";

/// `<base>.4280fs24`
pub fn source_path(base: &str) -> PathBuf {
    PathBuf::from(format!("{base}.{SOURCE_EXTENSION}"))
}

/// `<base>.asm`
pub fn output_path(base: &str) -> PathBuf {
    PathBuf::from(format!("{base}.asm"))
}
