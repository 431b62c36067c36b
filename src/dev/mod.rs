// src/dev/mod.rs
// Tooling shared by tests and the fuzz binary.
pub mod generator;
pub mod vm;
