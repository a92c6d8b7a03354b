use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use dotembed::SourceHashAlgorithm;

/// dotembed - embed source files into Portable PDB blobs and inspect existing blobs
#[derive(Debug, Parser)]
#[command(name = "dotembed", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Checksum algorithm selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Algorithm {
    Sha1,
    Sha256,
}

impl From<Algorithm> for SourceHashAlgorithm {
    fn from(value: Algorithm) -> Self {
        match value {
            Algorithm::Sha1 => SourceHashAlgorithm::Sha1,
            Algorithm::Sha256 => SourceHashAlgorithm::Sha256,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode source files into embedded source blobs and print their checksums.
    Embed {
        /// Source files to embed.
        #[arg(value_name = "FILE", required = true)]
        paths: Vec<PathBuf>,

        /// Checksum algorithm.
        #[arg(short, long, value_enum, default_value = "sha256")]
        algorithm: Algorithm,

        /// Write each blob to `<DIR>/<file name>.blob`.
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show the header of an embedded source blob and optionally extract its content.
    Inspect {
        /// Path to the blob file.
        #[arg(value_name = "BLOB")]
        path: PathBuf,

        /// Write the decoded content to this file.
        #[arg(short, long, value_name = "FILE")]
        extract: Option<PathBuf>,
    },
}
