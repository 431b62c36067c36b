// src/lexer/tables/io.rs
use std::{
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use super::dfa::{ALL_COLS, ALL_STATES, Cell, Col, Dfa, N_COLS, N_STATES, S};

// -------------------- JSON (de)serialization --------------------

#[serde_as]
#[derive(Serialize, Deserialize)]
struct DfaDisk {
    states: Vec<S>,
    columns: Vec<Col>,
    #[serde_as(as = "[_; 128]")]
    class_of: [Col; 128],
    next: Vec<Vec<Cell>>,
    start: S,
}

impl From<&Dfa> for DfaDisk {
    fn from(d: &Dfa) -> Self {
        Self {
            states: ALL_STATES.to_vec(),
            columns: ALL_COLS.to_vec(),
            class_of: d.class_of,
            next: d.next.iter().map(|row| row.to_vec()).collect(),
            start: d.start,
        }
    }
}

impl DfaDisk {
    fn into_dfa(self) -> Result<Dfa, String> {
        if self.states.as_slice() != ALL_STATES.as_slice()
            || self.columns.as_slice() != ALL_COLS.as_slice()
        {
            return Err("state/column layout does not match this build".into());
        }
        if self.next.len() != N_STATES {
            return Err(format!("expected {N_STATES} rows, found {}", self.next.len()));
        }
        let mut next = [[Cell::Go(S::Start); N_COLS]; N_STATES];
        for (s, row) in self.next.into_iter().enumerate() {
            next[s] = row
                .try_into()
                .map_err(|r: Vec<Cell>| format!("row {s}: expected {N_COLS} cells, found {}", r.len()))?;
        }
        Ok(Dfa {
            class_of: self.class_of,
            next,
            start: self.start,
        })
    }
}

pub fn dfa_to_json(d: &Dfa) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&DfaDisk::from(d))
}

pub fn save_dfa_json(path: &Path, d: &Dfa) -> std::io::Result<()> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &DfaDisk::from(d))?;
    w.flush()
}

pub fn load_dfa_json_bytes(data: &[u8]) -> Result<Dfa, String> {
    serde_json::from_slice::<DfaDisk>(data)
        .map_err(|e| format!("Failed to parse DFA JSON: {e}"))?
        .into_dfa()
}
