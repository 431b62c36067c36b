// src/lexer/mod.rs
// Pull-based DFA lexer: one token per call, one character of lookahead.

pub mod tables;

use std::{iter::Peekable, str::Chars};

use log::{debug, trace};

use crate::error::{CompileResult, LexicalSnafu};
use tables::{
    dfa::{Cell, DFA, Fault},
    tokens::{Keyword, Token, TokenKind},
};

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    /// Line the lexer is currently on (1-based).
    pub fn line(&self) -> usize {
        self.line
    }

    fn fail<T>(&self, fault: Fault, ch: Option<char>) -> CompileResult<T> {
        let message = match ch {
            Some(c) if !c.is_whitespace() => format!("{} ({c:?})", fault.template()),
            _ => fault.template().to_string(),
        };
        LexicalSnafu {
            message,
            line: self.line,
        }
        .fail()
    }

    fn finish(&self, kind: TokenKind, text: String) -> Token {
        let kind = match kind {
            TokenKind::Ident => Keyword::lookup(&text).map_or(TokenKind::Ident, TokenKind::Keyword),
            k => k,
        };
        let text = if kind == TokenKind::Eof {
            "EOF".to_string()
        } else {
            text
        };
        trace!("token {kind:?} {text:?} line {}", self.line);
        Token::new(kind, text, self.line)
    }

    /// Scans the next token. End of input yields an `Eof` token (repeatedly).
    pub fn next_token(&mut self) -> CompileResult<Token> {
        let dfa = &*DFA;
        let mut state = dfa.start;
        let mut text = String::new();

        loop {
            let ch = self.chars.next();
            let col = dfa.column(ch);

            match dfa.step(state, col) {
                Cell::Fail(fault) => return self.fail(fault, ch),
                Cell::Accept(kind) => {
                    if let Some(c) = ch {
                        text.push(c);
                    }
                    return Ok(self.finish(kind, text));
                }
                Cell::Go(next) => {
                    if ch == Some('\n') {
                        self.line += 1;
                    }
                    if next.builds_token() {
                        if let Some(c) = ch {
                            text.push(c);
                        }
                    }
                    state = next;
                }
            }

            // Identifier and integer runs end as soon as the next character
            // cannot extend them; that character is left in the stream.
            if state.needs_lookahead() {
                let peeked = self.chars.peek().copied();
                match dfa.step(state, dfa.column(peeked)) {
                    Cell::Accept(kind) => return Ok(self.finish(kind, text)),
                    Cell::Fail(fault) => return self.fail(fault, peeked),
                    Cell::Go(_) => {}
                }
            }
        }
    }
}

/// Scans a whole source into tokens, ending with the `Eof` token.
/// Diagnostics only; the parser pulls tokens one at a time.
pub fn tokenize(source: &str) -> CompileResult<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut out = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        let done = tok.kind == TokenKind::Eof;
        out.push(tok);
        if done {
            debug!("lexed {} tokens over {} lines", out.len(), lexer.line());
            return Ok(out);
        }
    }
}

pub fn print_tokens(tokens: &[Token], out: &mut impl std::io::Write) -> std::io::Result<()> {
    writeln!(out, "{:<5} {:<16} Lexeme", "Line", "Kind")?;
    for t in tokens {
        writeln!(out, "{:<5} {:<16} {}", t.line, format!("{:?}", t.kind), t.lexeme)?;
    }
    Ok(())
}
