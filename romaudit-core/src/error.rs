use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

pub const ERR_LOADING_ARCHIVE: i32 = -100;
pub const ERR_NAVIGATING_ARCHIVE: i32 = -101;
pub const ERR_OPENING_COMPRESSED_FILE: i32 = -102;
pub const ERR_READING_COMPRESSED_FILE: i32 = -103;
/// Anything that is not an archive failure (catalog parsing, output files).
pub const ERR_OTHER: i32 = -1;

#[derive(Error, Debug)]
pub enum RomAuditError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("cannot load archive {}: {source}", path.display())]
    ArchiveLoad {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("cannot navigate archive {}: {source}", path.display())]
    ArchiveNavigation {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("cannot open compressed file {name}: {source}")]
    CompressedFileOpen {
        name: String,
        #[source]
        source: ZipError,
    },

    #[error("cannot read compressed file {name}: {source}")]
    CompressedFileRead {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl RomAuditError {
    /// Stable negative code for callers that discriminate on integers.
    pub fn code(&self) -> i32 {
        match self {
            Self::ArchiveLoad { .. } => ERR_LOADING_ARCHIVE,
            Self::ArchiveNavigation { .. } => ERR_NAVIGATING_ARCHIVE,
            Self::CompressedFileOpen { .. } => ERR_OPENING_COMPRESSED_FILE,
            Self::CompressedFileRead { .. } => ERR_READING_COMPRESSED_FILE,
            Self::Io(_) | Self::Format(_) => ERR_OTHER,
        }
    }

    /// True for failures scoped to a single entry; the archive itself is still usable.
    pub fn is_entry_error(&self) -> bool {
        matches!(
            self,
            Self::CompressedFileOpen { .. } | Self::CompressedFileRead { .. }
        )
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, RomAuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_errors_carry_distinct_codes() {
        let load = RomAuditError::ArchiveLoad {
            path: "a.zip".into(),
            source: ZipError::InvalidArchive("bad".into()),
        };
        let nav = RomAuditError::ArchiveNavigation {
            path: "a.zip".into(),
            source: ZipError::InvalidArchive("bad".into()),
        };
        let open = RomAuditError::CompressedFileOpen {
            name: "x.bin".into(),
            source: ZipError::FileNotFound,
        };
        let read = RomAuditError::CompressedFileRead {
            name: "x.bin".into(),
            source: std::io::Error::other("inflate"),
        };
        assert_eq!(load.code(), -100);
        assert_eq!(nav.code(), -101);
        assert_eq!(open.code(), -102);
        assert_eq!(read.code(), -103);
        assert!(!load.is_entry_error());
        assert!(!nav.is_entry_error());
        assert!(open.is_entry_error());
        assert!(read.is_entry_error());
        assert_eq!(RomAuditError::Format("x".into()).code(), ERR_OTHER);
    }
}
