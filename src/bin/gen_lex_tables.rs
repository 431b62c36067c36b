// src/bin/gen_lex_tables.rs
// Dump the lexer DFA to JSON for inspection or external tooling.
// Usage:
//   cargo run --bin gen_lex_tables                # writes tables/lexer_dfa.json
//   cargo run --bin gen_lex_tables -- /path/out.json

use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use kestrelc::lexer::tables::{DFA, dfa::N_COLS, dfa::N_STATES, save_dfa_json};

fn main() -> Result<()> {
    let out = env::args()
        .nth(1)
        .unwrap_or_else(|| "tables/lexer_dfa.json".to_string());
    let out_path = Path::new(&out);

    if let Some(dir) = out_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    println!(
        "[gen_lex_tables] {N_STATES} states x {N_COLS} classes = {} cells",
        N_STATES * N_COLS
    );
    save_dfa_json(out_path, &DFA)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    println!("[gen_lex_tables] wrote {}", out_path.display());
    Ok(())
}
