use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(about = "Build and inspect MyFS images")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty image
    Format {
        /// Image file
        image: PathBuf,

        /// Number of 512-byte blocks
        #[arg(long, short, default_value_t = 2048)]
        blocks: usize,
    },

    /// Create an image holding every regular file of a host directory
    Pack {
        /// Image file
        image: PathBuf,

        /// Number of 512-byte blocks
        #[arg(long, short, default_value_t = 2048)]
        blocks: usize,

        /// Host directory to copy from
        #[arg(long, short)]
        source: PathBuf,
    },

    /// List the root directory
    Ls {
        /// Image file
        image: PathBuf,
    },

    /// Print a file to stdout
    Cat {
        /// Image file
        image: PathBuf,

        /// File name inside the root directory
        name: String,
    },
}
