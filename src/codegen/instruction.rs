// src/codegen/instruction.rs

use std::fmt;

/// Operand of an accumulator instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Name(String),    // variable or temporary
    Literal(String), // integer literal, spelled as in the source
    Imm(i64),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Name(n) | Operand::Literal(n) => f.write_str(n),
            Operand::Imm(i) => write!(f, "{i}"),
        }
    }
}

/// Branch taken on the sign of the accumulator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Condition {
    Pos,     // acc > 0
    Neg,     // acc < 0
    ZeroPos, // acc >= 0
    ZeroNeg, // acc <= 0
    Zero,    // acc == 0
}

impl Condition {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Condition::Pos => "BRPOS",
            Condition::Neg => "BRNEG",
            Condition::ZeroPos => "BRZPOS",
            Condition::ZeroNeg => "BRZNEG",
            Condition::Zero => "BRZERO",
        }
    }

    pub fn holds(self, acc: i64) -> bool {
        match self {
            Condition::Pos => acc > 0,
            Condition::Neg => acc < 0,
            Condition::ZeroPos => acc >= 0,
            Condition::ZeroNeg => acc <= 0,
            Condition::Zero => acc == 0,
        }
    }
}

/// One line of target assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Read(String),
    Write(String),
    Load(Operand),
    Store(String),
    Add(String),
    Sub(String),
    Mult(Operand),
    Div(String),
    Br(String),
    Branch { cond: Condition, label: String },
    Label(String), // `label: NOOP`
    Stop,
}

impl Instruction {
    pub fn to_asm(&self) -> String {
        match self {
            Instruction::Read(n) => format!("READ {n}"),
            Instruction::Write(n) => format!("WRITE {n}"),
            Instruction::Load(o) => format!("LOAD {o}"),
            Instruction::Store(n) => format!("STORE {n}"),
            Instruction::Add(n) => format!("ADD {n}"),
            Instruction::Sub(n) => format!("SUB {n}"),
            Instruction::Mult(o) => format!("MULT {o}"),
            Instruction::Div(n) => format!("DIV {n}"),
            Instruction::Br(l) => format!("BR {l}"),
            Instruction::Branch { cond, label } => format!("{} {label}", cond.mnemonic()),
            Instruction::Label(l) => format!("{l}: NOOP"),
            Instruction::Stop => "STOP".to_string(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_asm())
    }
}
