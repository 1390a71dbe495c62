#![forbid(unsafe_code)]

pub mod catalog;
pub mod domain;
pub mod error;
pub mod policy;
pub mod stats;

pub mod util {
    pub mod hex;
}

pub mod read {
    pub mod archive;
    pub mod extract;
    pub mod lookup;
}

pub mod audit {
    pub mod auditor;
    pub mod record;
    pub mod scan;
}

pub mod list;

// Re-exports: stable API surface
pub use audit::auditor::{AuditReport, SetStatus, audit_archive, audit_path};
pub use audit::record::{AuditStatus, RomAudit};
pub use audit::scan::{ScanEntry, discover_archives, scan_directory};
pub use catalog::Catalog;
pub use domain::{ArchiveEntry, RomDefinition};
pub use error::{Result, RomAuditError};
pub use list::list;
pub use policy::{OverflowPolicy, Policy};
pub use read::archive::ArchiveReader;
pub use read::extract::extract;
