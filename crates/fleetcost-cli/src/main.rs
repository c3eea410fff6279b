//! fleetcost - equipment fleet cost tracker
//!
//! Keeps a directory of machines in a local JSON store and reports what each
//! one costs to own and run: depreciation, fuel, maintenance, and insurance
//! per year, the resulting hourly cost, and a marked-up billing rate.
//!
//! Subcommands cover editing the fleet (`add`, `update`, `status`,
//! `duplicate`, `remove`), reading it (`list`, `show`, `stats`, `attention`,
//! `recent`), what-if costing without saving (`calc`), moving data between
//! machines (`export`, `import --dry-run`), and persistent defaults (`config`).
//! Set `RUST_LOG` or pass `-v` for diagnostics on stderr.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
