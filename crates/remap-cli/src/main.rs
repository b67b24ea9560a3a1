use clap::Parser;
use remap_cli::{CliArgs, driver};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match driver::run(&args) {
        Ok(summary) if summary.errors > 0 => std::process::exit(1),
        Ok(_) => {}
        Err(error) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("remap: {error:#}");
            }
            std::process::exit(2);
        }
    }
}
