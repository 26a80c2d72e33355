use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    process::ExitCode,
    thread,
};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use num_bigint::BigInt;
use shamir_recover::{SecretSharing, ShareSet, MAX_BASE, MIN_BASE};

/// Recovers Shamir secrets from JSON share documents.
#[derive(Parser)]
#[command(name = "shamir-recover", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Recover the secret of each share document (the default)
    Recover(RecoverArgs),
    /// Deal shares of a secret and print them as a share document
    Split(SplitArgs),
}

#[derive(Args)]
struct RecoverArgs {
    /// Share documents, one test case each
    #[arg(default_values = ["testcase1.json", "testcase2.json"])]
    files: Vec<PathBuf>,
}

#[derive(Args)]
struct SplitArgs {
    /// The secret, in decimal
    #[arg(long, allow_hyphen_values = true)]
    secret: BigInt,
    /// Threshold of shares needed to recover
    #[arg(short)]
    k: usize,
    /// Number of shares to deal
    #[arg(short)]
    n: usize,
    /// Radix used to write share values
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(MIN_BASE as i64..=MAX_BASE as i64))]
    base: u32,
    /// Bit width of the random coefficients
    #[arg(long, default_value_t = 256)]
    bits: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Some(Command::Split(args)) => match split(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e:#}");
                ExitCode::FAILURE
            }
        },
        Some(Command::Recover(args)) => recover(&args.files),
        None => recover(&[
            PathBuf::from("testcase1.json"),
            PathBuf::from("testcase2.json"),
        ]),
    }
}

fn load(path: &Path) -> Result<ShareSet> {
    let file =
        File::open(path).with_context(|| format!("Cannot open file: {}", path.display()))?;
    let set = ShareSet::from_reader(BufReader::new(file))?;
    Ok(set)
}

fn solve(path: &Path) -> Result<(ShareSet, BigInt)> {
    let set = load(path)?;
    let secret = set.recover()?;
    Ok((set, secret))
}

// Test cases share nothing, so each file gets its own thread. Results are
// reported in argument order.
fn recover(files: &[PathBuf]) -> ExitCode {
    let outcomes: Vec<Result<(ShareSet, BigInt)>> = thread::scope(|scope| {
        let handles: Vec<_> = files
            .iter()
            .map(|path| scope.spawn(move || solve(path)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(anyhow!("worker thread panicked")))
            })
            .collect()
    });

    let mut failed = false;
    for (i, (path, outcome)) in files.iter().zip(outcomes).enumerate() {
        let case = i + 1;
        match outcome {
            Ok((set, secret)) => {
                if set.points().len() != set.n() {
                    eprintln!(
                        "Warning: Test Case {case} ({}) declares n = {} but holds {} shares",
                        path.display(),
                        set.n(),
                        set.points().len()
                    );
                }
                println!("Secret from Test Case {case}: {secret}");
            }
            Err(e) => {
                failed = true;
                eprintln!("Error in Test Case {case} ({}): {e:#}", path.display());
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn split(args: &SplitArgs) -> Result<()> {
    let mut rng = rand::thread_rng();
    let set = SecretSharing(args.k).split_rng(&args.secret, args.n, args.bits, &mut rng)?;
    let document = set.to_document(args.base)?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
