use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the remap binary.
#[derive(Parser, Debug)]
#[command(
    name = "remap",
    version,
    about = "Build-time mapping code generator: type graph in, transformation routines out"
)]
pub struct CliArgs {
    /// Path to the type graph document (JSON).
    pub input: PathBuf,

    /// Directory the generated source units are written into.
    #[arg(short = 'o', long = "out-dir", default_value = "generated")]
    pub out_dir: PathBuf,

    /// Analyze and report diagnostics without writing any files.
    #[arg(long)]
    pub check: bool,

    /// Print the computed mapping plans as JSON to stdout.
    #[arg(long = "dump-plans")]
    pub dump_plans: bool,
}
