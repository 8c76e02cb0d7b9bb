//! zkvote command-line tool
//!
//! Computes ballot commitments, nullifiers, tallies and Merkle roots natively
//! and checks each one against the matching circuit.
//!
//! Run with: cargo run --release -- commit --choice 2 --identity 12345 --ballot-id 1
//! Verbose:  cargo run --release -- -vv tally --num-choices 3 --votes 0,1,2,0,1

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use ff::Field;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, info, info_span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zkvote_gadgets::{
    circuit::{
        solve, BallotWitness, InclusionCircuit, InclusionWitness, TallyCircuit, TallyWitness,
        VoteCommitCircuit, VoteRevealCircuit,
    },
    config,
    utils::{field_to_u64, parse_field},
    voting, CompressionGadget, FieldElement, GadgetError, HashPrimitive, MerkleTree,
    MimcCompression, NullifierRegistry, PoseidonCompression, Result,
};

/// Command-line arguments for the zkvote tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Compression primitive used for commitments, nullifiers and trees
    #[arg(long, value_enum, default_value_t = HashPrimitive::Poseidon, global = true)]
    hash: HashPrimitive,

    /// Increase output verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Inputs shared by the commit and reveal subcommands
#[derive(clap::Args, Debug)]
struct BallotArgs {
    /// Index of the chosen option, in [0, num-choices)
    #[arg(long)]
    choice: u64,

    /// Number of options on the ballot
    #[arg(long, default_value_t = 3)]
    num_choices: usize,

    /// Voter identity secret (decimal field element)
    #[arg(long)]
    identity: String,

    /// Blinding salt (decimal field element); random if omitted
    #[arg(long)]
    salt: Option<String>,

    /// Ballot identifier (decimal field element)
    #[arg(long)]
    ballot_id: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a vote commitment and prove it is well formed
    Commit(BallotArgs),

    /// Open a commitment and derive its nullifier
    Reveal {
        #[command(flatten)]
        ballot: BallotArgs,

        /// Commitment published during the commit phase; recomputed if omitted
        #[arg(long)]
        commitment: Option<String>,

        /// Nullifier registry file; the reveal is rejected if already recorded
        #[arg(long)]
        registry: Option<PathBuf>,
    },

    /// Count votes and prove the counts
    Tally {
        #[arg(long, default_value_t = 3)]
        num_choices: usize,

        /// Comma-separated vote values
        #[arg(long, value_delimiter = ',', required = true)]
        votes: Vec<u64>,
    },

    /// Build a tree from leaves and prove inclusion of one of them
    Root {
        #[arg(long, default_value_t = config::DEFAULT_TREE_DEPTH)]
        depth: usize,

        /// Comma-separated decimal leaf values
        #[arg(long, value_delimiter = ',', required = true)]
        leaves: Vec<String>,

        /// Leaf to prove
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Print the authentication path as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.hash {
        HashPrimitive::Poseidon => run::<PoseidonCompression>(cli.command),
        HashPrimitive::Mimc => run::<MimcCompression>(cli.command),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run<H: CompressionGadget>(command: Command) -> Result<()> {
    let _span = info_span!("zkvote", hash = H::NAME).entered();
    match command {
        Command::Commit(args) => commit::<H>(&args),
        Command::Reveal {
            ballot,
            commitment,
            registry,
        } => reveal::<H>(&ballot, commitment.as_deref(), registry),
        Command::Tally { num_choices, votes } => tally(num_choices, &votes),
        Command::Root {
            depth,
            leaves,
            index,
            json,
        } => root::<H>(depth, &leaves, index, json),
    }
}

/// Parses ballot arguments and computes the expected commitment.
fn ballot_witness<H: CompressionGadget>(
    args: &BallotArgs,
    commitment: Option<&str>,
) -> Result<BallotWitness> {
    let identity = parse_field(&args.identity)?;
    let ballot_id = parse_field(&args.ballot_id)?;
    let salt = match &args.salt {
        Some(s) => parse_field(s)?,
        None => {
            let mut rng = StdRng::from_entropy();
            let salt = FieldElement::random(&mut rng);
            info!(salt = ?salt, "Generated random salt; keep it to reveal later");
            salt
        }
    };
    let commitment = match commitment {
        Some(c) => parse_field(c)?,
        None => voting::commitment::<H>(args.choice, identity, salt, ballot_id)?,
    };
    Ok(BallotWitness::new(
        args.choice,
        identity,
        salt,
        ballot_id,
        commitment,
    ))
}

fn commit<H: CompressionGadget>(args: &BallotArgs) -> Result<()> {
    let witness = ballot_witness::<H>(args, None)?;
    let circuit = VoteCommitCircuit::<H>::new(args.num_choices, Some(witness))?;
    let solved = solve(&circuit)?;

    info!(constraints = solved.num_constraints, "Commitment proven well formed");
    for (name, value) in &solved.public {
        info!("  {} = {:?}", name, value);
    }
    Ok(())
}

fn reveal<H: CompressionGadget>(
    args: &BallotArgs,
    commitment: Option<&str>,
    registry_path: Option<PathBuf>,
) -> Result<()> {
    let witness = ballot_witness::<H>(args, commitment)?;
    let ballot_id = witness.ballot_id;
    let circuit = VoteRevealCircuit::<H>::new(args.num_choices, Some(witness))?;
    let solved = solve(&circuit)?;

    let nullifier_hash = solved
        .get("nullifier_hash")
        .ok_or_else(|| GadgetError::Synthesis("reveal produced no nullifier".to_string()))?;
    info!(constraints = solved.num_constraints, nullifier = ?nullifier_hash, "Reveal accepted");

    if let Some(path) = registry_path {
        let mut registry = NullifierRegistry::load_or_default(&path)?;
        registry.record(ballot_id, nullifier_hash)?;
        registry.save(&path)?;
        info!(
            reveals = registry.count(ballot_id),
            "Nullifier recorded for ballot"
        );
    }
    Ok(())
}

fn tally(num_choices: usize, votes: &[u64]) -> Result<()> {
    let expected = voting::tally(votes, num_choices)?;
    let circuit = TallyCircuit::new(
        num_choices,
        votes.len(),
        Some(TallyWitness::from_choices(votes)),
    )?;
    let solved = solve(&circuit)?;

    info!(
        votes = votes.len(),
        constraints = solved.num_constraints,
        "Tally proven"
    );
    for (j, (value, native)) in solved.public_values().iter().zip(&expected).enumerate() {
        let count = field_to_u64(value).ok_or_else(|| {
            GadgetError::Synthesis(format!("count_{} does not fit in u64", j))
        })?;
        if count != *native {
            return Err(GadgetError::Synthesis(format!(
                "count_{} is {} in circuit but {} natively",
                j, count, native
            )));
        }
        info!("  choice {}: {}", j, count);
    }
    Ok(())
}

fn root<H: CompressionGadget>(
    depth: usize,
    leaves: &[String],
    index: usize,
    json: bool,
) -> Result<()> {
    let leaves = leaves
        .iter()
        .map(|s| parse_field(s))
        .collect::<Result<Vec<_>>>()?;
    let tree = MerkleTree::<H>::from_leaves(depth, &leaves)?;
    let proof = tree.proof(index)?;

    let circuit = InclusionCircuit::<H>::new(
        depth,
        Some(InclusionWitness::from_proof(&proof, tree.root())),
    )?;
    let solved = solve(&circuit)?;

    info!(root = ?tree.root(), leaves = tree.len(), capacity = tree.capacity(), "Built tree");
    info!(
        index,
        constraints = solved.num_constraints,
        "Inclusion proven"
    );

    if json {
        let encoded = serde_json::to_string_pretty(&proof)
            .map_err(|e| GadgetError::Serialization(format!("Failed to encode proof: {}", e)))?;
        println!("{}", encoded);
    }
    Ok(())
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info,zkvote_gadgets=info,nova_snark=warn",
        1 => "debug,zkvote_gadgets=debug,nova_snark=info",
        _ => "zkvote_gadgets=trace,zkvote=trace,nova_snark=debug",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    use tracing_tree::HierarchicalLayer;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            HierarchicalLayer::new(2)
                .with_targets(false)
                .with_bracketed_fields(true),
        )
        .init();
}
