// src/parser/grammar.rs
// The grammar the parser implements, kept as BNF next to the code so tools can
// read it. Terminals are spelled as the lexer spells them; "identifier" and
// "integer" stand for those token classes and "" is the empty alternative.

use bnf::{Grammar, Term};

pub const GRAMMAR_BNF: &str = include_str!("../../grammar/kestrel.bnf");

pub fn load() -> Result<Grammar, bnf::Error> {
    GRAMMAR_BNF.parse()
}

/// Left-hand sides in declaration order.
pub fn nonterminals(grammar: &Grammar) -> Vec<String> {
    grammar
        .productions_iter()
        .filter_map(|p| match &p.lhs {
            Term::Nonterminal(name) => Some(name.clone()),
            _ => None,
        })
        .collect()
}

/// Every distinct non-empty terminal used on a right-hand side.
pub fn terminals(grammar: &Grammar) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for p in grammar.productions_iter() {
        for alt in p.rhs_iter() {
            for term in alt.terms_iter() {
                if let Term::Terminal(t) = term {
                    if !t.is_empty() && !out.contains(t) {
                        out.push(t.clone());
                    }
                }
            }
        }
    }
    out
}
