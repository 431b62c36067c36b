// src/bin/fuzz_compile.rs
// Generate random-but-valid programs, compile each one sequentially and on the
// rayon pool, and compare. Every output must also load in the reference VM.
// Env:
//   FUZZ_SEED=42  FUZZ_ITERS=64  FUZZ_LEN=4096
//   FUZZ_SAVE=1 and FUZZ_DIR=...  save every generated case, not only failures
//   FUZZ_INPUT=path               replay a saved case

use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
    process,
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result, bail};
use kestrelc::{
    SOURCE_EXTENSION, compile,
    dev::{generator::gen_valid_source, vm::Machine},
};
use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[derive(serde::Serialize)]
struct CaseMeta<'a> {
    unix_ts: u64,
    seed: u64,
    iter: usize,
    requested_len: usize,
    actual_bytes: usize,
    outcome: &'a str,
    note: &'a str,
}

fn save_case(dir: &Path, meta: &CaseMeta<'_>, src: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(format!(
        "case_s{}_i{}_n{}.{SOURCE_EXTENSION}",
        meta.seed,
        meta.iter,
        src.len()
    ));
    fs::write(&path, src).with_context(|| format!("failed to write {}", path.display()))?;

    let meta_path = path.with_extension("json");
    let mut f = fs::File::create(&meta_path)
        .with_context(|| format!("failed to write {}", meta_path.display()))?;
    writeln!(f, "{}", serde_json::to_string_pretty(meta)?)?;
    Ok(path)
}

/// Compiles once and checks the output loads. Returns the assembly.
fn check_one(src: &str) -> Result<String> {
    let asm = compile(src)?;
    if let Err(e) = Machine::load(&asm) {
        bail!("generated assembly does not load: {e}");
    }
    Ok(asm)
}

fn replay(path: &str) -> Result<()> {
    eprintln!("[replay] reading {path}");
    let src = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let t0 = Instant::now();
    let asm = check_one(&src)?;
    eprintln!(
        "[replay] {} lines of assembly in {} ms",
        asm.lines().count(),
        t0.elapsed().as_millis()
    );
    Ok(())
}

fn fuzz() -> Result<bool> {
    let seed: u64 = env_or("FUZZ_SEED", 42);
    let iters: usize = env_or("FUZZ_ITERS", 64);
    let len: usize = env_or("FUZZ_LEN", 4096);
    let save_all = env::var("FUZZ_SAVE").ok().as_deref() == Some("1");
    let dir = PathBuf::from(env::var("FUZZ_DIR").unwrap_or_else(|_| "fuzz-cases".into()));

    eprintln!("[fuzz] len={len} iters={iters} seed={seed}");
    let mut rng = StdRng::seed_from_u64(seed);
    let sources: Vec<String> = (0..iters).map(|_| gen_valid_source(&mut rng, len)).collect();

    let t0 = Instant::now();
    let sequential: Vec<Result<String>> = sources.iter().map(|s| check_one(s)).collect();
    let t1 = Instant::now();
    let parallel: Vec<Result<String>> = sources.par_iter().map(|s| check_one(s)).collect();
    let t2 = Instant::now();
    eprintln!(
        "[fuzz] sequential {} ms  |  parallel {} ms",
        (t1 - t0).as_millis(),
        (t2 - t1).as_millis()
    );

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let mut ok = true;

    for (i, (src, (seq, par))) in sources
        .iter()
        .zip(sequential.iter().zip(parallel.iter()))
        .enumerate()
    {
        let outcome = match (seq, par) {
            (Ok(a), Ok(b)) if a == b => "ok",
            (Ok(_), Ok(_)) => "parallel output differs",
            (Err(e), _) | (_, Err(e)) => {
                eprintln!("[fuzz] iter {i}: {e:#}");
                "compile failure"
            }
        };
        let failed = outcome != "ok";
        ok &= !failed;
        if failed || save_all {
            let meta = CaseMeta {
                unix_ts: ts,
                seed,
                iter: i,
                requested_len: len,
                actual_bytes: src.len(),
                outcome,
                note: "Replay with: FUZZ_INPUT=<this file> cargo run --bin fuzz_compile",
            };
            let path = save_case(&dir, &meta, src)?;
            eprintln!("[save] iter {i} ({outcome}) -> {}", path.display());
        }
    }
    Ok(ok)
}

fn main() -> Result<()> {
    if let Ok(path) = env::var("FUZZ_INPUT") {
        return replay(&path);
    }
    if !fuzz()? {
        eprintln!("[fuzz] mismatches found");
        process::exit(1);
    }
    eprintln!("[fuzz] all iterations matched");
    Ok(())
}
