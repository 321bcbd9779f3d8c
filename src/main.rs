//! Fasta command-line tool.
//!
//! Usage:
//!   fasta keygen --output key.txt
//!   fasta encrypt --key key.txt --input plain.txt --output cipher.txt
//!   fasta decrypt --key key.txt --input cipher.txt --output plain.txt

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use fasta::utils::block_file;
use fasta::{BitVector, ChaChaSource, Fasta, FastaError, GlibcRandom, MaskSource, WORD_BITS};

#[derive(Parser)]
#[command(name = "fasta")]
#[command(version)]
#[command(about = "Fasta stream cipher over hexadecimal block files", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random 329-bit key file
    Keygen {
        /// Output key file
        #[arg(short, long)]
        output: PathBuf,

        /// Seed for a reproducible key (operating-system entropy if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Encrypt a plaintext block file
    Encrypt(SessionArgs),

    /// Decrypt a ciphertext block file
    Decrypt(SessionArgs),
}

#[derive(clap::Args)]
struct SessionArgs {
    /// Key file
    #[arg(short, long)]
    key: PathBuf,

    /// Input block file
    #[arg(short, long)]
    input: PathBuf,

    /// Output block file
    #[arg(short, long)]
    output: PathBuf,

    /// Randomness source for masks and rotation schedules
    #[arg(long, value_enum, default_value_t = SourceKind::Glibc)]
    source: SourceKind,

    /// Session seed; decryption must use the encryption's seed
    #[arg(long, default_value = "1")]
    seed: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceKind {
    /// C library random(), compatible with the reference tooling
    Glibc,
    /// ChaCha20 counter-based stream
    Chacha,
}

impl SourceKind {
    fn build(self, seed: u64) -> Box<dyn MaskSource> {
        match self {
            // srandom takes an unsigned int
            SourceKind::Glibc => Box::new(GlibcRandom::with_seed(seed as u32)),
            SourceKind::Chacha => Box::new(ChaChaSource::seed_from_u64(seed)),
        }
    }
}

fn keygen(output: &Path, seed: Option<u64>) -> Result<(), FastaError> {
    let mut source = match seed {
        Some(seed) => ChaChaSource::seed_from_u64(seed),
        None => ChaChaSource::from_os_rng(),
    };
    let key = BitVector::random(WORD_BITS, &mut source);
    block_file::write_key(output, &key)?;
    info!("Key written to {}", output.display());
    Ok(())
}

fn run_session(args: &SessionArgs, decrypt: bool) -> Result<(), FastaError> {
    let key = block_file::read_key(&args.key)?;
    let input = block_file::read_blocks(&args.input)?;
    info!("Read {} blocks from {}", input.len(), args.input.display());

    let cipher = Fasta::new(key)?;
    let mut source = args.source.build(args.seed);
    let output = if decrypt {
        cipher.decrypt(&input, source.as_mut())?
    } else {
        cipher.encrypt(&input, source.as_mut())?
    };

    block_file::write_blocks(&args.output, &output)?;
    info!("Wrote {} blocks to {}", output.len(), args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("fasta: could not install the log subscriber");
    }

    let result = match &cli.command {
        Commands::Keygen { output, seed } => keygen(output, *seed),
        Commands::Encrypt(args) => run_session(args, false),
        Commands::Decrypt(args) => run_session(args, true),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
