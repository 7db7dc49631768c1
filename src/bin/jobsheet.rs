use anyhow::Result;
use clap::Parser;
use jobsheet::cli::{self, Cli};
use jobsheet::context::StandardContext;
use jobsheet::logging;
use std::io;

fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init(args.verbose);

    let ctx = StandardContext::new(args.root);
    let stdin = io::stdin();
    let stdout = io::stdout();
    cli::run(args.command, &ctx, &mut stdin.lock(), &mut stdout.lock())
}
