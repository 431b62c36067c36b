// src/parser/tree.rs
//! Concrete syntax tree.
//!
//! Every node carries the production it was built from, the terminals that
//! production captured, and up to four owned children. Nodes can only be
//! created through the per-production constructors below, so the set of
//! populated child slots always matches the label. An empty slot means the
//! epsilon alternative was taken.

use std::fmt;

use serde::Serialize;

use crate::lexer::tables::tokens::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Label {
    Program,
    Vars,
    VarList,
    VarList2,
    Stats,
    MStat,
    Stat,
    Block,
    Read,
    Print,
    Cond,
    Iter,
    Assign,
    Relational,
    Exp,
    Exp2,
    M,
    M2,
    N,
    N2,
    R,
}

impl Label {
    pub const ALL: [Label; 21] = [
        Label::Program,
        Label::Vars,
        Label::VarList,
        Label::VarList2,
        Label::Stats,
        Label::MStat,
        Label::Stat,
        Label::Block,
        Label::Read,
        Label::Print,
        Label::Cond,
        Label::Iter,
        Label::Assign,
        Label::Relational,
        Label::Exp,
        Label::Exp2,
        Label::M,
        Label::M2,
        Label::N,
        Label::N2,
        Label::R,
    ];

    /// Nonterminal name as written in the grammar.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Program => "program",
            Label::Vars => "vars",
            Label::VarList => "varList",
            Label::VarList2 => "varList2",
            Label::Stats => "stats",
            Label::MStat => "mstat",
            Label::Stat => "stat",
            Label::Block => "block",
            Label::Read => "read",
            Label::Print => "print",
            Label::Cond => "cond",
            Label::Iter => "iter",
            Label::Assign => "assign",
            Label::Relational => "relational",
            Label::Exp => "exp",
            Label::Exp2 => "exp2",
            Label::M => "M",
            Label::M2 => "M2",
            Label::N => "N",
            Label::N2 => "N2",
            Label::R => "R",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Child = Option<Box<Node>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    label: Label,
    tokens: Vec<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    child1: Child,
    #[serde(skip_serializing_if = "Option::is_none")]
    child2: Child,
    #[serde(skip_serializing_if = "Option::is_none")]
    child3: Child,
    #[serde(skip_serializing_if = "Option::is_none")]
    child4: Child,
}

fn own(n: Node) -> Child {
    Some(Box::new(n))
}

fn maybe(n: Option<Node>) -> Child {
    n.map(Box::new)
}

impl Node {
    fn with(label: Label, tokens: Vec<Token>, children: [Child; 4]) -> Self {
        let [child1, child2, child3, child4] = children;
        Self {
            label,
            tokens,
            child1,
            child2,
            child3,
            child4,
        }
    }

    fn leaf(label: Label, tokens: Vec<Token>) -> Self {
        Self::with(label, tokens, [None, None, None, None])
    }

    // ---------------- one constructor per production ----------------

    /// program -> 'program' vars block
    pub fn program(vars: Node, block: Node) -> Self {
        Self::with(Label::Program, Vec::new(), [own(vars), own(block), None, None])
    }

    /// vars -> ε | 'var' varList
    pub fn vars(list: Option<Node>) -> Self {
        Self::with(Label::Vars, Vec::new(), [maybe(list), None, None, None])
    }

    /// varList -> identifier ',' integer varList2
    pub fn var_list(name: Token, value: Token, rest: Node) -> Self {
        Self::with(Label::VarList, vec![name, value], [own(rest), None, None, None])
    }

    /// varList2 -> ';' | varList
    pub fn var_list2(more: Option<Node>) -> Self {
        Self::with(Label::VarList2, Vec::new(), [maybe(more), None, None, None])
    }

    /// stats -> stat mstat
    pub fn stats(first: Node, rest: Option<Node>) -> Self {
        Self::with(Label::Stats, Vec::new(), [own(first), maybe(rest), None, None])
    }

    /// mstat -> stat mstat  (the ε alternative is an absent mstat)
    pub fn mstat(first: Node, rest: Option<Node>) -> Self {
        Self::with(Label::MStat, Vec::new(), [own(first), maybe(rest), None, None])
    }

    /// stat -> read | print | block | cond | iter | assign
    pub fn stat(inner: Node) -> Self {
        debug_assert!(matches!(
            inner.label,
            Label::Read | Label::Print | Label::Block | Label::Cond | Label::Iter | Label::Assign
        ));
        Self::with(Label::Stat, Vec::new(), [own(inner), None, None, None])
    }

    /// block -> 'start' vars stats 'stop'
    pub fn block(vars: Node, stats: Node) -> Self {
        Self::with(Label::Block, Vec::new(), [own(vars), own(stats), None, None])
    }

    /// read -> 'read' identifier ';'
    pub fn read(name: Token) -> Self {
        Self::leaf(Label::Read, vec![name])
    }

    /// print -> 'print' exp ';'
    pub fn print(exp: Node) -> Self {
        Self::with(Label::Print, Vec::new(), [own(exp), None, None, None])
    }

    /// cond -> 'iff' '[' exp relational exp ']' stat
    pub fn cond(brackets: [Token; 2], left: Node, op: Node, right: Node, body: Node) -> Self {
        Self::guarded(Label::Cond, brackets, left, op, right, body)
    }

    /// iter -> 'iterate' '[' exp relational exp ']' stat
    pub fn iter(brackets: [Token; 2], left: Node, op: Node, right: Node, body: Node) -> Self {
        Self::guarded(Label::Iter, brackets, left, op, right, body)
    }

    fn guarded(
        label: Label,
        brackets: [Token; 2],
        left: Node,
        op: Node,
        right: Node,
        body: Node,
    ) -> Self {
        Self::with(
            label,
            brackets.into(),
            [own(left), own(op), own(right), own(body)],
        )
    }

    /// assign -> 'set' identifier exp ';'
    pub fn assign(name: Token, exp: Node) -> Self {
        Self::with(Label::Assign, vec![name], [own(exp), None, None, None])
    }

    /// relational -> '.le.' | '.ge.' | '.lt.' | '.gt.' | '~' | '**'
    pub fn relational(op: Token) -> Self {
        Self::leaf(Label::Relational, vec![op])
    }

    /// exp -> M exp2
    pub fn exp(m: Node, tail: Option<Node>) -> Self {
        Self::with(Label::Exp, Vec::new(), [own(m), maybe(tail), None, None])
    }

    /// exp2 -> '+' exp | '-' exp
    pub fn exp2(op: Token, exp: Node) -> Self {
        Self::with(Label::Exp2, vec![op], [own(exp), None, None, None])
    }

    /// M -> N M2
    pub fn m(n: Node, tail: Option<Node>) -> Self {
        Self::with(Label::M, Vec::new(), [own(n), maybe(tail), None, None])
    }

    /// M2 -> '%' M
    pub fn m2(op: Token, m: Node) -> Self {
        Self::with(Label::M2, vec![op], [own(m), None, None, None])
    }

    /// N -> R N2
    pub fn n(r: Node, tail: Option<Node>) -> Self {
        Self::with(Label::N, Vec::new(), [own(r), maybe(tail), None, None])
    }

    /// N -> '-' N
    pub fn negate(minus: Token, n: Node) -> Self {
        Self::with(Label::N, vec![minus], [own(n), None, None, None])
    }

    /// N2 -> '/' N
    pub fn n2(op: Token, n: Node) -> Self {
        Self::with(Label::N2, vec![op], [own(n), None, None, None])
    }

    /// R -> '(' exp ')'
    pub fn group(open: Token, exp: Node, close: Token) -> Self {
        Self::with(Label::R, vec![open, close], [own(exp), None, None, None])
    }

    /// R -> identifier | integer
    pub fn atom(tok: Token) -> Self {
        Self::leaf(Label::R, vec![tok])
    }

    // ---------------- read access ----------------

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, i: usize) -> Option<&Token> {
        self.tokens.get(i)
    }

    /// Child in slot `i` (0-based, slots 0..4).
    pub fn child(&self, i: usize) -> Option<&Node> {
        match i {
            0 => self.child1.as_deref(),
            1 => self.child2.as_deref(),
            2 => self.child3.as_deref(),
            3 => self.child4.as_deref(),
            _ => None,
        }
    }

    /// Child the production always populates. Panics if the tree is malformed.
    pub fn expect_child(&self, i: usize) -> &Node {
        self.child(i)
            .unwrap_or_else(|| panic!("{} node has no child in slot {i}", self.label))
    }

    /// Captured terminal the production always records. Panics if the tree is malformed.
    pub fn expect_token(&self, i: usize) -> &Token {
        self.token(i)
            .unwrap_or_else(|| panic!("{} node has no token {i}", self.label))
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        (0..4).filter_map(move |i| self.child(i))
    }

    /// Number of nodes in this subtree.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn take_children(&mut self) -> impl Iterator<Item = Box<Node>> + use<> {
        [
            self.child1.take(),
            self.child2.take(),
            self.child3.take(),
            self.child4.take(),
        ]
        .into_iter()
        .flatten()
    }
}

// Statement sequences nest one level per statement, so the default recursive
// drop would use stack proportional to program length.
impl Drop for Node {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = self.take_children().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.take_children());
        }
    }
}
