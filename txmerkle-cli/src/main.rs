use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use txmerkle_core::merkle::{self, parse_leaves, Reduction};
use txmerkle_core::report::MerkleReport;
use txmerkle_core::verify::verify_root;

mod render;

use render::{render_steps, render_tree, rule};

// Four transactions from Bitcoin block #921500, used by `demo`.
const DEMO_TXS: [&str; 4] = [
    "b6d1d1ed7d2608ef67e7f8b40731bc5b8b60791cef0f11c7838f28d9ceccdb3e",
    "25ea15e5006d5a5dc0fded8366d5a9737798f00013dd806bfef5e1c53b4ea6ce",
    "0781d3b667230eb3b39cf4fa19467fb3794ef86145790585456632f761368833",
    "b2213ad46af2212709c3c8b53bae8e658315c00e080181db68ce54d749caa9de",
];
const DEMO_BLOCK_TX_COUNT: usize = 5406;
const DEMO_BLOCK_ROOT: &str = "bb89907babd1051c89aeac9583f3cbe7449b24090005897b5537b970b1ed16d1";

#[derive(Parser)]
#[command(name = "txmerkle", version, about = "Bitcoin-style Merkle roots over transaction hashes")]
struct Cli {
    /// Log reduction progress to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Compute the Merkle root of a list of transaction hashes
    Root {
        #[command(flatten)]
        leaves: LeafArgs,
        /// Print every pair combined on the way up
        #[arg(long, default_value_t = false)]
        trace: bool,
        /// Emit a JSON report with all levels and pair steps
        #[arg(long, default_value_t = false, conflicts_with = "trace")]
        json: bool,
    },
    /// Check a claimed Merkle root against a list of transaction hashes
    Verify {
        #[arg(long)]
        expected: String,
        #[command(flatten)]
        leaves: LeafArgs,
    },
    /// Draw the tree as ASCII
    Tree {
        #[command(flatten)]
        leaves: LeafArgs,
    },
    /// Walk through four transactions from block #921500
    Demo,
}

#[derive(Args)]
struct LeafArgs {
    /// Transaction hashes in display (big-endian) hex
    hashes: Vec<String>,
    /// Read hashes from a file, one per line ("-" for stdin)
    #[arg(long, conflicts_with = "hashes")]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Cmd::Root { leaves, trace, json } => root(&leaves, trace, json)?,
        Cmd::Verify { expected, leaves } => verify(&leaves, &expected)?,
        Cmd::Tree { leaves } => tree(&leaves)?,
        Cmd::Demo => demo()?,
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_hashes(args: &LeafArgs) -> Result<Vec<String>> {
    let Some(path) = &args.file else {
        return Ok(args.hashes.clone());
    };
    let text = if path.as_os_str() == "-" {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s).context("read hashes from stdin")?;
        s
    } else {
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };
    let hashes: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect();
    debug!(count = hashes.len(), source = %path.display(), "loaded hashes");
    Ok(hashes)
}

fn reduce_args(args: &LeafArgs) -> Result<Reduction> {
    let leaves = parse_leaves(&read_hashes(args)?)?;
    Ok(merkle::reduce(&leaves)?)
}

fn root(args: &LeafArgs, trace: bool, json: bool) -> Result<()> {
    let r = reduce_args(args)?;
    if json {
        println!("{}", MerkleReport::from(&r).to_json_pretty()?);
        return Ok(());
    }
    if trace {
        println!("Starting with {} transaction hashes\n", r.leaf_count());
        print!("{}", render_steps(&r));
        println!("Merkle root: {}", r.root_hex());
    } else {
        println!("{}", r.root_hex());
    }
    Ok(())
}

fn verify(args: &LeafArgs, expected: &str) -> Result<()> {
    let leaves = parse_leaves(&read_hashes(args)?)?;
    let rep = verify_root(&leaves, expected)?;
    info!(leaves = rep.leaf_count, computed = %rep.computed, "verified");
    if rep.merkle_ok {
        println!("Merkle root OK ({} leaves)", rep.leaf_count);
        Ok(())
    } else {
        println!("Merkle root MISMATCH: computed {}, expected {}", rep.computed, rep.expected);
        bail!("merkle root mismatch")
    }
}

fn tree(args: &LeafArgs) -> Result<()> {
    let r = reduce_args(args)?;
    print!("{}", render_tree(&r));
    Ok(())
}

fn demo() -> Result<()> {
    let leaves = parse_leaves(&DEMO_TXS)?;
    let r = merkle::reduce(&leaves)?;

    println!("BITCOIN MERKLE TREE CALCULATOR");
    println!("{}", rule('='));
    println!("\nUsing {} real transaction hashes from Bitcoin block #921500\n", DEMO_TXS.len());
    for (i, tx) in DEMO_TXS.iter().enumerate() {
        println!("Transaction {}: {}", i + 1, tx);
    }

    println!("\n{}", rule('='));
    println!("MERKLE TREE VISUALIZATION");
    println!("{}\n", rule('='));
    print!("{}", render_tree(&r));
    println!("\n{}\n", rule('='));

    println!("Starting with {} transaction hashes\n", r.leaf_count());
    print!("{}", render_steps(&r));

    println!("{}", rule('='));
    println!("FINAL MERKLE ROOT: {}", r.root_hex());
    println!("{}", rule('='));
    println!("\nNote: this is the Merkle root for just these {} transactions.", DEMO_TXS.len());
    println!(
        "The full block #921500 has {} transactions; its real Merkle root is:\n{}",
        DEMO_BLOCK_TX_COUNT, DEMO_BLOCK_ROOT
    );
    Ok(())
}
