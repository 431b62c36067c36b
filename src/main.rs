// src/main.rs
// Command-line driver: `kestrelc [base]`.
//   no argument  -> read stdin, write a.asm
//   base         -> read <base>.4280fs24, write <base>.asm
// Env:
//   KESTRELC_LOG=error|warn|info|debug|trace
//   KESTRELC_DUMP_TOKENS=1        token table to stderr
//   KESTRELC_DUMP_TREE=1|json     parse tree to stderr

use std::{
    env, fs,
    io::{self, Read, Write},
    path::PathBuf,
    process,
};

use anyhow::{Context, Result, anyhow, bail};
use kestrelc::{
    SOURCE_EXTENSION,
    lexer::{print_tokens, tokenize},
    output_path, parse,
    parser::print::Preorder,
    source_path,
};
use log::{LevelFilter, Log, Metadata, Record, debug, warn};

const DEFAULT_OUTPUT: &str = "a.asm";

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging() {
    let level = env::var("KESTRELC_LOG")
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn env_flag(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty() && v != "0")
}

/// Where to read from and where the assembly goes.
struct Job {
    input: Option<PathBuf>,
    output: PathBuf,
}

fn job_from_args() -> Result<Job> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [] => Ok(Job {
            input: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }),
        [base] => Ok(Job {
            input: Some(source_path(base)),
            output: output_path(base),
        }),
        _ => bail!("Too many arguments\nusage: kestrelc [base]  (reads base.{SOURCE_EXTENSION})"),
    }
}

fn read_source(job: &Job) -> Result<String> {
    match &job.input {
        None => {
            let mut src = String::new();
            io::stdin()
                .read_to_string(&mut src)
                .context("failed to read standard input")?;
            Ok(src)
        }
        Some(path) => fs::read_to_string(path).with_context(|| {
            format!(
                "{} does not exist or is unreadable! File must end with extension .{SOURCE_EXTENSION}",
                path.display()
            )
        }),
    }
}

fn dump_diagnostics(src: &str) {
    if env_flag("KESTRELC_DUMP_TOKENS").is_some() {
        match tokenize(src) {
            Ok(tokens) => {
                if let Err(e) = print_tokens(&tokens, &mut io::stderr()) {
                    warn!("token dump failed: {e}");
                }
            }
            Err(e) => warn!("token dump stopped: {e}"),
        }
    }
    if let Some(mode) = env_flag("KESTRELC_DUMP_TREE") {
        match parse(src) {
            Ok(tree) if mode == "json" => match tree.to_json() {
                Ok(json) => eprintln!("{json}"),
                Err(e) => warn!("tree dump failed: {e}"),
            },
            Ok(tree) => eprint!("{}", Preorder(&tree)),
            Err(e) => warn!("tree dump stopped: {e}"),
        }
    }
}

/// Compiles into memory first; the output file is only created on success.
fn compile(src: &str) -> Result<String> {
    kestrelc::compile(src).map_err(|e| anyhow!("{e}\nERROR {}", e.stage()))
}

fn run() -> Result<PathBuf> {
    let job = job_from_args()?;
    let src = read_source(&job)?;
    debug!("read {} bytes of source", src.len());
    dump_diagnostics(&src);

    let asm = compile(&src)?;
    let mut f = fs::File::create(&job.output)
        .with_context(|| format!("Failed to open build file {}", job.output.display()))?;
    f.write_all(asm.as_bytes())
        .and_then(|_| f.flush())
        .with_context(|| format!("failed to write {}", job.output.display()))?;
    Ok(job.output)
}

fn main() {
    init_logging();
    match run() {
        Ok(out) => {
            debug!("wrote {}", out.display());
            println!("Compilation Success");
        }
        Err(e) => {
            println!("{e:#}");
            println!("Compilation Failure");
            process::exit(1);
        }
    }
}
