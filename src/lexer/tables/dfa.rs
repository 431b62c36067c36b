// src/lexer/tables/dfa.rs
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::tokens::TokenKind;

/// Non-final DFA states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum S {
    Start,
    Ident,
    Int,

    // .le. .lt. .ge. .gt.
    Dot,
    DotL,
    DotG,
    DotLe,
    DotLt,
    DotGe,
    DotGt,

    // first '*' of "**"
    Star,

    // @@ ... @
    CommentOpen,
    CommentBody,
}

impl S {
    #[inline]
    pub fn idx(self) -> usize {
        self as usize
    }

    /// States whose token may end on the next character without consuming it.
    #[inline]
    pub fn needs_lookahead(self) -> bool {
        matches!(self, S::Ident | S::Int)
    }

    /// States whose consumed characters belong to the token text.
    #[inline]
    pub fn builds_token(self) -> bool {
        !matches!(self, S::Start | S::CommentOpen | S::CommentBody)
    }
}

pub const N_STATES: usize = 13;

pub const ALL_STATES: [S; N_STATES] = [
    S::Start,
    S::Ident,
    S::Int,
    S::Dot,
    S::DotL,
    S::DotG,
    S::DotLe,
    S::DotLt,
    S::DotGe,
    S::DotGt,
    S::Star,
    S::CommentOpen,
    S::CommentBody,
];

/// Character classes (table columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Col {
    Letter, // any letter without a role in an operator
    L,
    G,
    E,
    T,
    Digit,
    Underscore,
    White,
    Equals,
    Dot,
    Tilde,
    Colon,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Comma,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    At,
    Eof,
    Invalid,
}

impl Col {
    #[inline]
    pub fn idx(self) -> usize {
        self as usize
    }
}

pub const N_COLS: usize = 28;

pub const ALL_COLS: [Col; N_COLS] = [
    Col::Letter,
    Col::L,
    Col::G,
    Col::E,
    Col::T,
    Col::Digit,
    Col::Underscore,
    Col::White,
    Col::Equals,
    Col::Dot,
    Col::Tilde,
    Col::Colon,
    Col::Semicolon,
    Col::Plus,
    Col::Minus,
    Col::Star,
    Col::Slash,
    Col::Percent,
    Col::LParen,
    Col::RParen,
    Col::Comma,
    Col::LBrace,
    Col::RBrace,
    Col::LBracket,
    Col::RBracket,
    Col::At,
    Col::Eof,
    Col::Invalid,
];

const LETTERS: &[Col] = &[Col::Letter, Col::L, Col::G, Col::E, Col::T];

/// Error states, each with its own message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fault {
    InvalidChar,
    IdentStart,
    Operator,
    IntSuffix,
    CommentStart,
    CommentUnterminated,
}

impl Fault {
    pub fn template(self) -> &'static str {
        match self {
            Fault::InvalidChar => "character is not in the language alphabet",
            Fault::IdentStart => "identifiers must begin with a letter",
            Fault::Operator => "malformed operator, expected one of .le. .ge. .lt. .gt. **",
            Fault::IntSuffix => "integer runs directly into a letter or underscore",
            Fault::CommentStart => "comments must begin with @@",
            Fault::CommentUnterminated => "comment reaches end of input without its closing @",
        }
    }
}

/// One table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Go(S),
    Accept(TokenKind),
    Fail(Fault),
}

/// Fully materialized lexer DFA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub class_of: [Col; 128],            // ASCII byte -> column
    pub next: [[Cell; N_COLS]; N_STATES], // [state][column] -> cell
    pub start: S,
}

/// Built on first use and shared read-only afterwards.
pub static DFA: LazyLock<Dfa> = LazyLock::new(Dfa::new);

fn column_of_ascii(b: u8) -> Col {
    match b {
        b'l' => Col::L,
        b'g' => Col::G,
        b'e' => Col::E,
        b't' => Col::T,
        b'a'..=b'z' | b'A'..=b'Z' => Col::Letter,
        b'0'..=b'9' => Col::Digit,
        b'_' => Col::Underscore,
        b' ' | b'\t' | b'\r' | b'\n' | 0x0B | 0x0C => Col::White,
        b'=' => Col::Equals,
        b'.' => Col::Dot,
        b'~' => Col::Tilde,
        b':' => Col::Colon,
        b';' => Col::Semicolon,
        b'+' => Col::Plus,
        b'-' => Col::Minus,
        b'*' => Col::Star,
        b'/' => Col::Slash,
        b'%' => Col::Percent,
        b'(' => Col::LParen,
        b')' => Col::RParen,
        b',' => Col::Comma,
        b'{' => Col::LBrace,
        b'}' => Col::RBrace,
        b'[' => Col::LBracket,
        b']' => Col::RBracket,
        b'@' => Col::At,
        _ => Col::Invalid,
    }
}

fn set(next: &mut [[Cell; N_COLS]; N_STATES], from: S, cols: &[Col], to: Cell) {
    for &c in cols {
        next[from.idx()][c.idx()] = to;
    }
}

fn set_all_except(next: &mut [[Cell; N_COLS]; N_STATES], from: S, except: &[Col], to: Cell) {
    for c in ALL_COLS {
        if !except.contains(&c) {
            next[from.idx()][c.idx()] = to;
        }
    }
}

impl Dfa {
    pub fn new() -> Self {
        let mut class_of = [Col::Invalid; 128];
        for b in 0u8..128 {
            class_of[b as usize] = column_of_ascii(b);
        }

        // Every cell not set below rejects the character outright.
        let mut next = [[Cell::Fail(Fault::InvalidChar); N_COLS]; N_STATES];

        // Start
        set(&mut next, S::Start, LETTERS, Cell::Go(S::Ident));
        set(&mut next, S::Start, &[Col::Digit], Cell::Go(S::Int));
        set(&mut next, S::Start, &[Col::Underscore], Cell::Fail(Fault::IdentStart));
        set(&mut next, S::Start, &[Col::White], Cell::Go(S::Start));
        set(&mut next, S::Start, &[Col::Dot], Cell::Go(S::Dot));
        set(&mut next, S::Start, &[Col::Star], Cell::Go(S::Star));
        set(&mut next, S::Start, &[Col::At], Cell::Go(S::CommentOpen));
        for (col, kind) in [
            (Col::Equals, TokenKind::Assign),
            (Col::Tilde, TokenKind::Tilde),
            (Col::Colon, TokenKind::Colon),
            (Col::Semicolon, TokenKind::Semicolon),
            (Col::Plus, TokenKind::Plus),
            (Col::Minus, TokenKind::Minus),
            (Col::Slash, TokenKind::Slash),
            (Col::Percent, TokenKind::Percent),
            (Col::LParen, TokenKind::LParen),
            (Col::RParen, TokenKind::RParen),
            (Col::Comma, TokenKind::Comma),
            (Col::LBrace, TokenKind::LBrace),
            (Col::RBrace, TokenKind::RBrace),
            (Col::LBracket, TokenKind::LBracket),
            (Col::RBracket, TokenKind::RBracket),
            (Col::Eof, TokenKind::Eof),
        ] {
            set(&mut next, S::Start, &[col], Cell::Accept(kind));
        }

        // Ident: letters/digits/underscore continue, anything legal ends the token.
        set_all_except(&mut next, S::Ident, &[Col::Invalid], Cell::Accept(TokenKind::Ident));
        set(&mut next, S::Ident, LETTERS, Cell::Go(S::Ident));
        set(&mut next, S::Ident, &[Col::Digit, Col::Underscore], Cell::Go(S::Ident));

        // Int
        set_all_except(&mut next, S::Int, &[Col::Invalid], Cell::Accept(TokenKind::Int));
        set(&mut next, S::Int, &[Col::Digit], Cell::Go(S::Int));
        set(&mut next, S::Int, LETTERS, Cell::Fail(Fault::IntSuffix));
        set(&mut next, S::Int, &[Col::Underscore], Cell::Fail(Fault::IntSuffix));

        // Dotted relational operators
        for s in [S::Dot, S::DotL, S::DotG, S::DotLe, S::DotLt, S::DotGe, S::DotGt] {
            set_all_except(&mut next, s, &[Col::Invalid], Cell::Fail(Fault::Operator));
        }
        set(&mut next, S::Dot, &[Col::L], Cell::Go(S::DotL));
        set(&mut next, S::Dot, &[Col::G], Cell::Go(S::DotG));
        set(&mut next, S::DotL, &[Col::E], Cell::Go(S::DotLe));
        set(&mut next, S::DotL, &[Col::T], Cell::Go(S::DotLt));
        set(&mut next, S::DotG, &[Col::E], Cell::Go(S::DotGe));
        set(&mut next, S::DotG, &[Col::T], Cell::Go(S::DotGt));
        set(&mut next, S::DotLe, &[Col::Dot], Cell::Accept(TokenKind::LessEq));
        set(&mut next, S::DotLt, &[Col::Dot], Cell::Accept(TokenKind::Less));
        set(&mut next, S::DotGe, &[Col::Dot], Cell::Accept(TokenKind::GreaterEq));
        set(&mut next, S::DotGt, &[Col::Dot], Cell::Accept(TokenKind::Greater));

        // "**"
        set_all_except(&mut next, S::Star, &[Col::Invalid], Cell::Fail(Fault::Operator));
        set(&mut next, S::Star, &[Col::Star], Cell::Accept(TokenKind::StarStar));

        // Comments: contents may be anything, including characters outside the alphabet.
        set_all_except(&mut next, S::CommentOpen, &[Col::Invalid], Cell::Fail(Fault::CommentStart));
        set(&mut next, S::CommentOpen, &[Col::At], Cell::Go(S::CommentBody));
        set(&mut next, S::CommentOpen, &[Col::Eof], Cell::Fail(Fault::CommentUnterminated));
        set_all_except(&mut next, S::CommentBody, &[], Cell::Go(S::CommentBody));
        set(&mut next, S::CommentBody, &[Col::At], Cell::Go(S::Start));
        set(&mut next, S::CommentBody, &[Col::Eof], Cell::Fail(Fault::CommentUnterminated));

        Self {
            class_of,
            next,
            start: S::Start,
        }
    }

    /// Column of a character; `None` is end of input.
    #[inline]
    pub fn column(&self, ch: Option<char>) -> Col {
        match ch {
            None => Col::Eof,
            Some(c) if c.is_ascii() => self.class_of[c as usize],
            Some(_) => Col::Invalid,
        }
    }

    #[inline]
    pub fn step(&self, state: S, col: Col) -> Cell {
        self.next[state.idx()][col.idx()]
    }
}

impl Default for Dfa {
    fn default() -> Self {
        Self::new()
    }
}
