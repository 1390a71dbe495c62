pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use romaudit_core::error::Result;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::List { archive } => handlers::handle_list(archive),
        Commands::Find {
            archive,
            crc,
            names,
            exact,
        } => handlers::handle_find(archive, crc, names, exact),
        Commands::Cat {
            archive,
            crc,
            max_len,
            strict,
        } => handlers::handle_cat(archive, crc, max_len, strict),
        Commands::Extract { archive, crc, dest } => handlers::handle_extract(archive, crc, dest),
        Commands::Audit {
            archive,
            catalog,
            set,
            verify,
            json,
        } => handlers::handle_audit(archive, catalog, set, verify, json),
        Commands::Scan {
            dir,
            catalog,
            verify,
            json,
        } => handlers::handle_scan(dir, catalog, verify, json),
    }
}
