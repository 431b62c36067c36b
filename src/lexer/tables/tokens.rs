// src/lexer/tables/tokens.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved spellings. An identifier matching one of these is retagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Start,
    Stop,
    Iterate,
    Var,
    Exit,
    Read,
    Print,
    Iff,
    Then,
    Set,
    Func,
    Program,
}

pub const KEYWORDS: [Keyword; 12] = [
    Keyword::Start,
    Keyword::Stop,
    Keyword::Iterate,
    Keyword::Var,
    Keyword::Exit,
    Keyword::Read,
    Keyword::Print,
    Keyword::Iff,
    Keyword::Then,
    Keyword::Set,
    Keyword::Func,
    Keyword::Program,
];

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Start => "start",
            Keyword::Stop => "stop",
            Keyword::Iterate => "iterate",
            Keyword::Var => "var",
            Keyword::Exit => "exit",
            Keyword::Read => "read",
            Keyword::Print => "print",
            Keyword::Iff => "iff",
            Keyword::Then => "then",
            Keyword::Set => "set",
            Keyword::Func => "func",
            Keyword::Program => "program",
        }
    }

    /// Exact, case-sensitive match against the reserved set.
    pub fn lookup(text: &str) -> Option<Keyword> {
        KEYWORDS.iter().copied().find(|k| k.as_str() == text)
    }

    /// Keywords that open a statement (FIRST set of `stat`).
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            Keyword::Read
                | Keyword::Print
                | Keyword::Start
                | Keyword::Iff
                | Keyword::Iterate
                | Keyword::Set
        )
    }
}

/// Token kinds of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Ident,
    Int,
    Keyword(Keyword),

    // relational operators
    LessEq,    // .le.
    GreaterEq, // .ge.
    Less,      // .lt.
    Greater,   // .gt.
    Tilde,     // ~  (not equal)
    StarStar,  // ** (equal)

    Assign, // =
    Colon,
    Semicolon,
    Plus,
    Minus,
    Slash,
    Percent,
    LParen,
    RParen,
    Comma,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    Eof,
}

impl TokenKind {
    pub fn is_relational(self) -> bool {
        use TokenKind::*;
        matches!(self, LessEq | GreaterEq | Less | Greater | Tilde | StarStar)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let s = match self {
            Ident => "identifier",
            Int => "integer",
            Keyword(k) => k.as_str(),
            LessEq => ".le.",
            GreaterEq => ".ge.",
            Less => ".lt.",
            Greater => ".gt.",
            Tilde => "~",
            StarStar => "**",
            Assign => "=",
            Colon => ":",
            Semicolon => ";",
            Plus => "+",
            Minus => "-",
            Slash => "/",
            Percent => "%",
            LParen => "(",
            RParen => ")",
            Comma => ",",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Eof => "EOF",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    #[inline]
    pub fn is_keyword(&self, k: Keyword) -> bool {
        self.kind == TokenKind::Keyword(k)
    }
}
