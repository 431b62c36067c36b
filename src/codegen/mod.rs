// src/codegen/mod.rs
// Tree-walking generator for the accumulator machine.
//
// Expressions always leave their value in the accumulator. Binary operators
// evaluate their right-hand tail first and spill it to a fresh temporary, then
// evaluate the head and combine with the spilled value. Conditions compile to
// an inverted branch that jumps past the guarded statement.

pub mod instruction;

use std::io::{self, Write};

use log::debug;
use snafu::ResultExt;

use crate::{
    error::{CompileResult, EmitSnafu},
    lexer::tables::tokens::TokenKind,
    parser::tree::{Label, Node},
};
use instruction::{Condition, Instruction, Operand};

/// Initial value registered for generator temporaries.
pub const UNINITIALIZED: i64 = -1;

pub const TEMP_PREFIX: &str = "_";
pub const LABEL_PREFIX: &str = "_B";

/// Storage the generator registers temporaries with and appends at the end.
pub trait Storage {
    fn insert(&mut self, name: &str, initial: i64);
    fn emit(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Generates code for `tree`, then `STOP`, then the storage section.
pub fn generate<W: Write>(tree: &Node, table: &mut dyn Storage, out: W) -> CompileResult<()> {
    let mut g = Generator::new(table, out);
    g.statement(tree)?;
    g.emit(Instruction::Stop)?;
    let Generator {
        table,
        mut out,
        emitted,
        temps,
        labels,
    } = g;
    table.emit(&mut out).context(EmitSnafu)?;
    out.flush().context(EmitSnafu)?;
    debug!("emitted {emitted} instructions, {temps} temporaries, {labels} labels");
    Ok(())
}

/// Per-compilation generator state. The naming counters start at zero for
/// every `Generator`, so separate compilations never share numbering.
pub struct Generator<'t, W: Write> {
    table: &'t mut dyn Storage,
    out: W,
    emitted: usize,
    temps: usize,
    labels: usize,
}

/// Skip branches for a relational operator: taken when the source condition
/// is false for `left - right` in the accumulator.
pub fn skip_conditions(op: TokenKind) -> &'static [Condition] {
    match op {
        TokenKind::LessEq => &[Condition::Pos],
        TokenKind::Less => &[Condition::ZeroPos],
        TokenKind::GreaterEq => &[Condition::Neg],
        TokenKind::Greater => &[Condition::ZeroNeg],
        TokenKind::Tilde => &[Condition::Zero],
        TokenKind::StarStar => &[Condition::Pos, Condition::Neg],
        other => unreachable!("{other:?} is not a relational operator"),
    }
}

impl<'t, W: Write> Generator<'t, W> {
    pub fn new(table: &'t mut dyn Storage, out: W) -> Self {
        Self {
            table,
            out,
            emitted: 0,
            temps: 0,
            labels: 0,
        }
    }

    fn emit(&mut self, ins: Instruction) -> CompileResult<()> {
        writeln!(self.out, "{ins}").context(EmitSnafu)?;
        self.emitted += 1;
        Ok(())
    }

    /// Fresh temporary, registered with the storage section.
    fn temp(&mut self) -> String {
        let name = format!("{TEMP_PREFIX}{}", self.temps);
        self.temps += 1;
        self.table.insert(&name, UNINITIALIZED);
        name
    }

    fn label(&mut self) -> String {
        let name = format!("{LABEL_PREFIX}{}", self.labels);
        self.labels += 1;
        name
    }

    fn spill(&mut self) -> CompileResult<String> {
        let t = self.temp();
        self.emit(Instruction::Store(t.clone()))?;
        Ok(t)
    }

    // ---------------- statements ----------------

    pub fn statement(&mut self, node: &Node) -> CompileResult<()> {
        match node.label() {
            // vars subtrees are handled by the symbol table, never here
            Label::Program | Label::Block => self.statement(node.expect_child(1)),
            Label::Stats | Label::MStat => {
                let mut link = Some(node);
                while let Some(n) = link {
                    self.statement(n.expect_child(0))?;
                    link = n.child(1);
                }
                Ok(())
            }
            Label::Stat => self.statement(node.expect_child(0)),
            Label::Read => {
                let name = node.expect_token(0).lexeme.clone();
                self.emit(Instruction::Read(name))
            }
            Label::Print => {
                self.exp(node.expect_child(0))?;
                let t = self.spill()?;
                self.emit(Instruction::Write(t))
            }
            Label::Assign => {
                self.exp(node.expect_child(0))?;
                let name = node.expect_token(0).lexeme.clone();
                self.emit(Instruction::Store(name))
            }
            Label::Cond => self.cond(node),
            Label::Iter => self.iter(node),
            other => unreachable!("{other} is not a statement production"),
        }
    }

    /// right -> temp; left; SUB temp; skip branch(es) to `end`
    fn test(&mut self, node: &Node, end: &str) -> CompileResult<()> {
        self.exp(node.expect_child(2))?;
        let right = self.spill()?;
        self.exp(node.expect_child(0))?;
        self.emit(Instruction::Sub(right))?;
        let op = node.expect_child(1).expect_token(0).kind;
        for &cond in skip_conditions(op) {
            self.emit(Instruction::Branch {
                cond,
                label: end.to_string(),
            })?;
        }
        Ok(())
    }

    /// cond -> 'iff' '[' exp relational exp ']' stat
    fn cond(&mut self, node: &Node) -> CompileResult<()> {
        let end = self.label();
        self.test(node, &end)?;
        self.statement(node.expect_child(3))?;
        self.emit(Instruction::Label(end))
    }

    /// iter -> 'iterate' '[' exp relational exp ']' stat
    fn iter(&mut self, node: &Node) -> CompileResult<()> {
        let top = self.label();
        self.emit(Instruction::Label(top.clone()))?;
        let end = self.label();
        self.test(node, &end)?;
        self.statement(node.expect_child(3))?;
        self.emit(Instruction::Br(top))?;
        self.emit(Instruction::Label(end))
    }

    // ---------------- expressions ----------------

    /// exp -> M exp2 ; exp2 -> '+' exp | '-' exp | ε
    fn exp(&mut self, node: &Node) -> CompileResult<()> {
        debug_assert_eq!(node.label(), Label::Exp);
        let Some(tail) = node.child(1) else {
            return self.m(node.expect_child(0));
        };
        self.exp(tail.expect_child(0))?;
        let t = self.spill()?;
        self.m(node.expect_child(0))?;
        match tail.expect_token(0).kind {
            TokenKind::Plus => self.emit(Instruction::Add(t)),
            TokenKind::Minus => self.emit(Instruction::Sub(t)),
            other => unreachable!("exp2 operator {other:?}"),
        }
    }

    /// M -> N M2 ; M2 -> '%' M | ε
    fn m(&mut self, node: &Node) -> CompileResult<()> {
        let Some(tail) = node.child(1) else {
            return self.n(node.expect_child(0));
        };
        self.m(tail.expect_child(0))?;
        let t = self.spill()?;
        self.n(node.expect_child(0))?;
        self.emit(Instruction::Mult(Operand::Name(t)))
    }

    /// N -> R N2 | '-' N ; N2 -> '/' N | ε
    fn n(&mut self, node: &Node) -> CompileResult<()> {
        if !node.tokens().is_empty() {
            self.n(node.expect_child(0))?;
            return self.emit(Instruction::Mult(Operand::Imm(-1)));
        }
        let Some(tail) = node.child(1) else {
            return self.r(node.expect_child(0));
        };
        self.n(tail.expect_child(0))?;
        let t = self.spill()?;
        self.r(node.expect_child(0))?;
        self.emit(Instruction::Div(t))
    }

    /// R -> '(' exp ')' | identifier | integer
    fn r(&mut self, node: &Node) -> CompileResult<()> {
        if let Some(inner) = node.child(0) {
            return self.exp(inner);
        }
        let tok = node.expect_token(0);
        let operand = match tok.kind {
            TokenKind::Ident => Operand::Name(tok.lexeme.clone()),
            TokenKind::Int => Operand::Literal(tok.lexeme.clone()),
            other => unreachable!("R leaf holds {other:?}"),
        };
        self.emit(Instruction::Load(operand))
    }
}
