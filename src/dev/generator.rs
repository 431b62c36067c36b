// src/dev/generator.rs
// Random-but-valid source programs for fuzzing and property tests.
// Every identifier used is declared in a visible scope, so generated programs
// pass semantic checks as well as parsing.

use rand::Rng;

const NAME_POOL: &[&str] = &[
    "x", "y", "n", "total", "count", "a1", "b_2", "iff2", "setx", "Stop", "k9", "acc",
];

const RELATIONAL: &[&str] = &[".le.", ".ge.", ".lt.", ".gt.", "~", "**"];

struct Gen<'r, R: Rng> {
    rng: &'r mut R,
    out: String,
    scopes: Vec<Vec<String>>,
    next_fresh: usize,
    comments: bool,
}

/// Produces a program of at least `target_len` bytes (small targets still
/// yield a complete program).
pub fn gen_valid_source<R: Rng>(rng: &mut R, target_len: usize) -> String {
    let comments = rng.random_bool(0.5);
    let mut g = Gen {
        rng,
        out: String::with_capacity(target_len + 64),
        scopes: vec![Vec::new()],
        next_fresh: 0,
        comments,
    };

    g.word("program");
    g.declarations(1, 4);
    g.word("start");
    g.scopes.push(Vec::new());
    g.declarations(0, 2);
    loop {
        g.statement(3);
        if g.out.len() >= target_len {
            break;
        }
    }
    g.scopes.pop();
    g.word("stop");
    g.out.push('\n');
    g.out
}

impl<R: Rng> Gen<'_, R> {
    fn sep(&mut self) {
        if self.out.is_empty() {
            return;
        }
        match self.rng.random_range(0u32..10) {
            0 => self.out.push('\n'),
            1 => self.out.push_str("\n  "),
            2 => self.out.push('\t'),
            _ => self.out.push(' '),
        }
        if self.comments && self.rng.random_bool(0.05) {
            self.out.push_str("@@note@ ");
        }
    }

    fn word(&mut self, w: &str) {
        self.sep();
        self.out.push_str(w);
    }

    fn fresh_name(&mut self) -> String {
        let base = NAME_POOL[self.next_fresh % NAME_POOL.len()];
        let name = if self.next_fresh < NAME_POOL.len() {
            base.to_string()
        } else {
            format!("{}{}", &base[..1], self.next_fresh)
        };
        self.next_fresh += 1;
        name
    }

    fn visible_name(&mut self) -> String {
        let all: Vec<&String> = self.scopes.iter().flatten().collect();
        let i = self.rng.random_range(0..all.len());
        all[i].clone()
    }

    fn declarations(&mut self, min: usize, max: usize) {
        let count = self.rng.random_range(min..=max);
        if count == 0 {
            return;
        }
        self.word("var");
        for _ in 0..count {
            let name = self.fresh_name();
            let value = self.rng.random_range(0u32..1000).to_string();
            self.word(&name);
            self.word(",");
            self.word(&value);
            self.scopes
                .last_mut()
                .expect("a scope is always open")
                .push(name);
        }
        self.word(";");
    }

    fn statement(&mut self, depth: usize) {
        let roll = if depth == 0 {
            self.rng.random_range(0u32..3)
        } else {
            self.rng.random_range(0u32..6)
        };
        match roll {
            0 => {
                self.word("read");
                let name = self.visible_name();
                self.word(&name);
                self.word(";");
            }
            1 => {
                self.word("print");
                self.exp(3);
                self.word(";");
            }
            2 => {
                self.word("set");
                let name = self.visible_name();
                self.word(&name);
                self.exp(3);
                self.word(";");
            }
            3 => {
                self.word("start");
                self.scopes.push(Vec::new());
                self.declarations(0, 2);
                let n = self.rng.random_range(1..=3);
                for _ in 0..n {
                    self.statement(depth - 1);
                }
                self.scopes.pop();
                self.word("stop");
            }
            _ => {
                self.word(if roll == 4 { "iff" } else { "iterate" });
                self.word("[");
                self.exp(2);
                let op = RELATIONAL[self.rng.random_range(0..RELATIONAL.len())];
                self.word(op);
                self.exp(2);
                self.word("]");
                self.statement(depth - 1);
            }
        }
    }

    fn exp(&mut self, depth: usize) {
        let roll = if depth == 0 {
            self.rng.random_range(0u32..2)
        } else {
            self.rng.random_range(0u32..8)
        };
        match roll {
            0 => {
                let name = self.visible_name();
                self.word(&name);
            }
            1 => {
                let v = self.rng.random_range(0u32..100_000).to_string();
                self.word(&v);
            }
            2 => {
                self.word("(");
                self.exp(depth - 1);
                self.word(")");
            }
            3 => {
                self.word("-");
                self.exp_atom(depth - 1);
            }
            _ => {
                self.exp_atom(depth - 1);
                let op = ["+", "-", "%", "/"][self.rng.random_range(0..4)];
                self.word(op);
                self.exp(depth - 1);
            }
        }
    }

    // Operand that is always a valid `N`, so `- x` and `x / y` stay in grammar.
    fn exp_atom(&mut self, depth: usize) {
        if depth > 0 && self.rng.random_bool(0.3) {
            self.word("(");
            self.exp(depth - 1);
            self.word(")");
        } else if self.rng.random_bool(0.5) {
            let name = self.visible_name();
            self.word(&name);
        } else {
            let v = self.rng.random_range(0u32..100).to_string();
            self.word(&v);
        }
    }
}
