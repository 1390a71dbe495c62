use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "romaudit: check ROM sets inside zip archives", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List archive contents (crc, size, packed size, path)
    List { archive: PathBuf },

    /// Look up one entry by CRC or by name
    Find {
        archive: PathBuf,
        /// CRC-32 in hex (e.g. 0x57bd7051)
        #[arg(long, conflicts_with = "names")]
        crc: Option<String>,
        /// candidate names, tried in order
        #[arg(long = "name", required_unless_present = "crc")]
        names: Vec<String>,
        /// require the full stored path to match instead of the file name
        #[arg(long)]
        exact: bool,
    },

    /// Decompress one entry (by CRC) to stdout
    Cat {
        archive: PathBuf,
        crc: String,
        /// buffer size; defaults to the entry's length
        #[arg(long)]
        max_len: Option<usize>,
        /// fail instead of truncating when --max-len is too small
        #[arg(long)]
        strict: bool,
    },

    /// Extract one entry (by CRC) into a directory
    Extract {
        archive: PathBuf,
        crc: String,
        dest: PathBuf,
    },

    /// Audit one archive against its set in a catalog
    Audit {
        archive: PathBuf,
        /// JSON catalog of ROM sets
        #[arg(long)]
        catalog: PathBuf,
        /// set name; defaults to the archive's file stem
        #[arg(long)]
        set: Option<String>,
        /// decompress every located ROM to check its data
        #[arg(long)]
        verify: bool,
        /// print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Audit every catalog set against the archives in a directory
    Scan {
        dir: PathBuf,
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        verify: bool,
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_needs_crc_or_name() {
        assert!(Cli::try_parse_from(["romaudit", "find", "a.zip"]).is_err());
        assert!(Cli::try_parse_from(["romaudit", "find", "a.zip", "--crc", "abcd"]).is_ok());
        assert!(
            Cli::try_parse_from(["romaudit", "find", "a.zip", "--name", "x", "--name", "y"])
                .is_ok()
        );
        assert!(
            Cli::try_parse_from(["romaudit", "find", "a.zip", "--crc", "1", "--name", "x"])
                .is_err()
        );
    }

    #[test]
    fn names_keep_their_order() {
        let cli = Cli::try_parse_from([
            "romaudit", "find", "a.zip", "--name", "b.bin", "--name", "a.bin", "--exact",
        ])
        .unwrap();
        match cli.command {
            Commands::Find { names, exact, .. } => {
                assert_eq!(names, vec!["b.bin", "a.bin"]);
                assert!(exact);
            }
            _ => panic!("expected find"),
        }
    }

    #[test]
    fn audit_requires_catalog() {
        assert!(Cli::try_parse_from(["romaudit", "audit", "sf2.zip"]).is_err());
        assert!(
            Cli::try_parse_from(["romaudit", "audit", "sf2.zip", "--catalog", "c.json"]).is_ok()
        );
    }
}
