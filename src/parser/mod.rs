// src/parser/mod.rs
// Predictive recursive-descent parser, one function per nonterminal.
// Pulls tokens from the lexer with a single token of lookahead and stops at
// the first mismatch.

pub mod grammar;
pub mod print;
pub mod tree;

use log::debug;

use crate::{
    error::{CompileResult, ParseSnafu},
    lexer::{
        Lexer,
        tables::tokens::{Keyword, Token, TokenKind},
    },
};
use tree::Node;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

/// Parses a complete program.
pub fn parse(source: &str) -> CompileResult<Node> {
    let mut parser = Parser::new(source)?;
    let root = parser.program()?;
    debug!("parsed {} nodes", root.size());
    Ok(root)
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    // ---------------- token plumbing ----------------

    fn advance(&mut self) -> CompileResult<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn error<T>(&self, expected: &str) -> CompileResult<T> {
        ParseSnafu {
            expected,
            given: self.current.lexeme.clone(),
            line: self.current.line,
        }
        .fail()
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn at_keyword(&self, k: Keyword) -> bool {
        self.current.is_keyword(k)
    }

    /// Consumes a token of `kind`, or fails naming `expected`.
    fn expect(&mut self, kind: TokenKind, expected: &str) -> CompileResult<Token> {
        if !self.at(kind) {
            return self.error(expected);
        }
        self.advance()
    }

    fn expect_keyword(&mut self, k: Keyword) -> CompileResult<Token> {
        self.expect(TokenKind::Keyword(k), k.as_str())
    }

    // ---------------- grammar ----------------

    /// program -> 'program' vars block, followed by end of input
    pub fn program(&mut self) -> CompileResult<Node> {
        self.expect_keyword(Keyword::Program)?;
        let vars = self.vars()?;
        let block = self.block()?;
        if !self.at(TokenKind::Eof) {
            return self.error("EOF");
        }
        Ok(Node::program(vars, block))
    }

    /// vars -> ε | 'var' varList
    fn vars(&mut self) -> CompileResult<Node> {
        if !self.at_keyword(Keyword::Var) {
            return Ok(Node::vars(None));
        }
        self.advance()?;
        Ok(Node::vars(Some(self.var_list()?)))
    }

    /// varList -> identifier ',' integer varList2
    /// varList2 -> ';' | varList
    fn var_list(&mut self) -> CompileResult<Node> {
        let (name, value) = self.var_entry()?;
        let mut more = Vec::new();
        while !self.at(TokenKind::Semicolon) {
            more.push(self.var_entry()?);
        }
        self.advance()?;
        let rest = more.into_iter().rev().fold(Node::var_list2(None), |rest, (n, v)| {
            Node::var_list2(Some(Node::var_list(n, v, rest)))
        });
        Ok(Node::var_list(name, value, rest))
    }

    /// identifier ',' integer
    fn var_entry(&mut self) -> CompileResult<(Token, Token)> {
        let name = self.expect(TokenKind::Ident, "identifier")?;
        self.expect(TokenKind::Comma, ",")?;
        let value = self.expect(TokenKind::Int, "integer")?;
        Ok((name, value))
    }

    /// stats -> stat mstat
    fn stats(&mut self) -> CompileResult<Node> {
        let first = self.stat()?;
        let rest = self.mstat()?;
        Ok(Node::stats(first, rest))
    }

    /// mstat -> ε | stat mstat
    /// Read in a loop and chained from the right: sequences may be arbitrarily long.
    fn mstat(&mut self) -> CompileResult<Option<Node>> {
        let mut run = Vec::new();
        while matches!(self.current.kind, TokenKind::Keyword(k) if k.starts_statement()) {
            run.push(self.stat()?);
        }
        Ok(run
            .into_iter()
            .rev()
            .fold(None, |rest, stat| Some(Node::mstat(stat, rest))))
    }

    /// stat -> read | print | block | cond | iter | assign
    fn stat(&mut self) -> CompileResult<Node> {
        let inner = match self.current.kind {
            TokenKind::Keyword(Keyword::Read) => self.read()?,
            TokenKind::Keyword(Keyword::Print) => self.print()?,
            TokenKind::Keyword(Keyword::Start) => self.block()?,
            TokenKind::Keyword(Keyword::Iff) => self.cond()?,
            TokenKind::Keyword(Keyword::Iterate) => self.iter()?,
            TokenKind::Keyword(Keyword::Set) => self.assign()?,
            _ => return self.error("statement keyword"),
        };
        Ok(Node::stat(inner))
    }

    /// block -> 'start' vars stats 'stop'
    fn block(&mut self) -> CompileResult<Node> {
        self.expect_keyword(Keyword::Start)?;
        let vars = self.vars()?;
        let stats = self.stats()?;
        self.expect_keyword(Keyword::Stop)?;
        Ok(Node::block(vars, stats))
    }

    /// read -> 'read' identifier ';'
    fn read(&mut self) -> CompileResult<Node> {
        self.expect_keyword(Keyword::Read)?;
        let name = self.expect(TokenKind::Ident, "identifier")?;
        self.expect(TokenKind::Semicolon, ";")?;
        Ok(Node::read(name))
    }

    /// print -> 'print' exp ';'
    fn print(&mut self) -> CompileResult<Node> {
        self.expect_keyword(Keyword::Print)?;
        let exp = self.exp()?;
        self.expect(TokenKind::Semicolon, ";")?;
        Ok(Node::print(exp))
    }

    /// '[' exp relational exp ']' stat, shared by cond and iter
    fn guard(&mut self) -> CompileResult<([Token; 2], Node, Node, Node, Node)> {
        let open = self.expect(TokenKind::LBracket, "[")?;
        let left = self.exp()?;
        let op = self.relational()?;
        let right = self.exp()?;
        let close = self.expect(TokenKind::RBracket, "]")?;
        let body = self.stat()?;
        Ok(([open, close], left, op, right, body))
    }

    /// cond -> 'iff' '[' exp relational exp ']' stat
    fn cond(&mut self) -> CompileResult<Node> {
        self.expect_keyword(Keyword::Iff)?;
        let (brackets, left, op, right, body) = self.guard()?;
        Ok(Node::cond(brackets, left, op, right, body))
    }

    /// iter -> 'iterate' '[' exp relational exp ']' stat
    fn iter(&mut self) -> CompileResult<Node> {
        self.expect_keyword(Keyword::Iterate)?;
        let (brackets, left, op, right, body) = self.guard()?;
        Ok(Node::iter(brackets, left, op, right, body))
    }

    /// assign -> 'set' identifier exp ';'
    fn assign(&mut self) -> CompileResult<Node> {
        self.expect_keyword(Keyword::Set)?;
        let name = self.expect(TokenKind::Ident, "identifier")?;
        let exp = self.exp()?;
        self.expect(TokenKind::Semicolon, ";")?;
        Ok(Node::assign(name, exp))
    }

    /// relational -> '.le.' | '.ge.' | '.lt.' | '.gt.' | '~' | '**'
    fn relational(&mut self) -> CompileResult<Node> {
        if !self.current.kind.is_relational() {
            return self.error("relational operator");
        }
        Ok(Node::relational(self.advance()?))
    }

    /// exp -> M exp2
    pub fn exp(&mut self) -> CompileResult<Node> {
        let m = self.m()?;
        let tail = self.exp2()?;
        Ok(Node::exp(m, tail))
    }

    /// exp2 -> '+' exp | '-' exp | ε
    fn exp2(&mut self) -> CompileResult<Option<Node>> {
        if !(self.at(TokenKind::Plus) || self.at(TokenKind::Minus)) {
            return Ok(None);
        }
        let op = self.advance()?;
        Ok(Some(Node::exp2(op, self.exp()?)))
    }

    /// M -> N M2
    fn m(&mut self) -> CompileResult<Node> {
        let n = self.n()?;
        let tail = self.m2()?;
        Ok(Node::m(n, tail))
    }

    /// M2 -> '%' M | ε
    fn m2(&mut self) -> CompileResult<Option<Node>> {
        if !self.at(TokenKind::Percent) {
            return Ok(None);
        }
        let op = self.advance()?;
        Ok(Some(Node::m2(op, self.m()?)))
    }

    /// N -> R N2 | '-' N
    fn n(&mut self) -> CompileResult<Node> {
        if self.at(TokenKind::Minus) {
            let minus = self.advance()?;
            return Ok(Node::negate(minus, self.n()?));
        }
        let r = self.r()?;
        let tail = self.n2()?;
        Ok(Node::n(r, tail))
    }

    /// N2 -> '/' N | ε
    fn n2(&mut self) -> CompileResult<Option<Node>> {
        if !self.at(TokenKind::Slash) {
            return Ok(None);
        }
        let op = self.advance()?;
        Ok(Some(Node::n2(op, self.n()?)))
    }

    /// R -> '(' exp ')' | identifier | integer
    fn r(&mut self) -> CompileResult<Node> {
        match self.current.kind {
            TokenKind::LParen => {
                let open = self.advance()?;
                let exp = self.exp()?;
                let close = self.expect(TokenKind::RParen, ")")?;
                Ok(Node::group(open, exp, close))
            }
            TokenKind::Ident | TokenKind::Int => Ok(Node::atom(self.advance()?)),
            _ => self.error("(, identifier, or integer"),
        }
    }
}
