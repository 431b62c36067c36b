// src/semantics/symbol_table.rs
//! Storage names and their initial values, in registration order.
//!
//! The table only grows during a compilation: declared variables go in
//! while the tree is checked, temporaries go in while code is generated,
//! and the whole table is written out as the data section at the end.

use std::io::{self, Write};

use hashbrown::HashMap;

use crate::codegen::Storage;

#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    entries: Vec<(String, i64)>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name`; returns false (and leaves the table unchanged) if present.
    pub fn declare(&mut self, name: &str, initial: i64) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), initial));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.index.get(name).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

impl Storage for SymbolTable {
    fn insert(&mut self, name: &str, initial: i64) {
        if let Some(&i) = self.index.get(name) {
            self.entries[i].1 = initial;
        } else {
            self.declare(name, initial);
        }
    }

    fn emit(&self, out: &mut dyn Write) -> io::Result<()> {
        for (name, value) in self.iter() {
            writeln!(out, "{name} {value}")?;
        }
        Ok(())
    }
}
