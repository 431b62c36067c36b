// src/dev/vm.rs
// Reference interpreter for generated assembly, used to check behaviour in
// tests. Instructions run until STOP; every line after STOP is a storage
// directive `name value`.

use hashbrown::HashMap;

use crate::codegen::instruction::Condition;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Read(String),
    Write(String),
    Load(String),
    Store(String),
    Add(String),
    Sub(String),
    Mult(String),
    Div(String),
    Br(String),
    Branch(Condition, String),
    Noop,
    Stop,
}

pub struct Machine {
    program: Vec<Op>,
    labels: HashMap<String, usize>,
    memory: HashMap<String, i64>,
    acc: i64,
}

pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

fn parse_op(mnemonic: &str, arg: Option<&str>, line_no: usize) -> Result<Op, String> {
    let need = |arg: Option<&str>| {
        arg.map(str::to_string)
            .ok_or_else(|| format!("line {line_no}: {mnemonic} needs an operand"))
    };
    let branch = |c: Condition| need(arg).map(|l| Op::Branch(c, l));
    Ok(match mnemonic {
        "READ" => Op::Read(need(arg)?),
        "WRITE" => Op::Write(need(arg)?),
        "LOAD" => Op::Load(need(arg)?),
        "STORE" => Op::Store(need(arg)?),
        "ADD" => Op::Add(need(arg)?),
        "SUB" => Op::Sub(need(arg)?),
        "MULT" => Op::Mult(need(arg)?),
        "DIV" => Op::Div(need(arg)?),
        "BR" => Op::Br(need(arg)?),
        "BRPOS" => branch(Condition::Pos)?,
        "BRNEG" => branch(Condition::Neg)?,
        "BRZPOS" => branch(Condition::ZeroPos)?,
        "BRZNEG" => branch(Condition::ZeroNeg)?,
        "BRZERO" => branch(Condition::Zero)?,
        "NOOP" => Op::Noop,
        "STOP" => Op::Stop,
        other => return Err(format!("line {line_no}: unknown mnemonic {other:?}")),
    })
}

impl Machine {
    pub fn load(asm: &str) -> Result<Self, String> {
        let mut program = Vec::new();
        let mut labels = HashMap::new();
        let mut memory = HashMap::new();
        let mut in_data = false;

        for (i, raw) in asm.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let mut words = line.split_whitespace();
            let first = words.next().unwrap_or_default();

            if in_data {
                let value = words
                    .next()
                    .and_then(|v| v.parse::<i64>().ok())
                    .ok_or_else(|| format!("line {line_no}: bad storage directive {line:?}"))?;
                memory.insert(first.to_string(), value);
                continue;
            }

            let (mnemonic, arg) = match first.strip_suffix(':') {
                Some(label) => {
                    if labels.insert(label.to_string(), program.len()).is_some() {
                        return Err(format!("line {line_no}: duplicate label {label}"));
                    }
                    (words.next().unwrap_or("NOOP"), words.next())
                }
                None => (first, words.next()),
            };
            let op = parse_op(mnemonic, arg, line_no)?;
            if op == Op::Stop {
                in_data = true;
            }
            program.push(op);
        }

        Ok(Self {
            program,
            labels,
            memory,
            acc: 0,
        })
    }

    fn value(&self, operand: &str) -> Result<i64, String> {
        if let Ok(v) = operand.parse::<i64>() {
            return Ok(v);
        }
        self.memory
            .get(operand)
            .copied()
            .ok_or_else(|| format!("no storage for {operand}"))
    }

    fn cell(&mut self, name: &str) -> Result<&mut i64, String> {
        self.memory
            .get_mut(name)
            .ok_or_else(|| format!("no storage for {name}"))
    }

    fn target(&self, label: &str) -> Result<usize, String> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| format!("unknown label {label}"))
    }

    /// Executes until STOP, feeding READs from `input`. Returns every value WRITTEN.
    pub fn run(&mut self, input: &[i64], step_limit: usize) -> Result<Vec<i64>, String> {
        let mut input = input.iter().copied();
        let mut output = Vec::new();
        let mut pc = 0usize;

        for _ in 0..step_limit {
            let op = self
                .program
                .get(pc)
                .cloned()
                .ok_or_else(|| format!("fell off the end of the program at {pc}"))?;
            pc += 1;
            match op {
                Op::Read(n) => {
                    let v = input.next().ok_or("READ with no input left")?;
                    *self.cell(&n)? = v;
                }
                Op::Write(n) => output.push(self.value(&n)?),
                Op::Load(n) => self.acc = self.value(&n)?,
                Op::Store(n) => {
                    let acc = self.acc;
                    *self.cell(&n)? = acc;
                }
                Op::Add(n) => self.acc = self.acc.wrapping_add(self.value(&n)?),
                Op::Sub(n) => self.acc = self.acc.wrapping_sub(self.value(&n)?),
                Op::Mult(n) => self.acc = self.acc.wrapping_mul(self.value(&n)?),
                Op::Div(n) => {
                    let d = self.value(&n)?;
                    if d == 0 {
                        return Err("division by zero".into());
                    }
                    self.acc = self.acc.wrapping_div(d);
                }
                Op::Br(l) => pc = self.target(&l)?,
                Op::Branch(c, l) => {
                    if c.holds(self.acc) {
                        pc = self.target(&l)?;
                    }
                }
                Op::Noop => {}
                Op::Stop => return Ok(output),
            }
        }
        Err(format!("no STOP within {step_limit} steps"))
    }

    pub fn memory(&self, name: &str) -> Option<i64> {
        self.memory.get(name).copied()
    }
}

/// Loads and runs `asm` in one go.
pub fn run(asm: &str, input: &[i64]) -> Result<Vec<i64>, String> {
    Machine::load(asm)?.run(input, DEFAULT_STEP_LIMIT)
}
