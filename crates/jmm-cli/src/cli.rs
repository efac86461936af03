use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "jmmc", bin_name = "jmmc")]
#[command(about = "J-- compiler targeting SPIM-style MIPS assembly")]
pub struct Cli {
    /// Path to the J-- source file
    pub source: PathBuf,
}
