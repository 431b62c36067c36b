// src/lexer/tables/mod.rs
pub mod dfa;
pub mod io;
pub mod tokens;

pub use dfa::{Cell, Col, DFA, Dfa, Fault, S};
pub use io::{load_dfa_json_bytes, save_dfa_json};
pub use tokens::{KEYWORDS, Keyword, Token, TokenKind};
