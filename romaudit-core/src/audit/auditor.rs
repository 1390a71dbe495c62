use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::audit::record::{AuditStatus, RomAudit};
use crate::domain::RomDefinition;
use crate::error::Result;
use crate::policy::Policy;
use crate::read::archive::ArchiveReader;
use crate::stats::AuditStats;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SetStatus {
    /// every required ROM is present and correct
    Complete,
    Partial,
    /// none of the required ROMs were found
    Missing,
}

#[derive(Clone, Debug, Serialize)]
pub struct AuditReport {
    pub container_path: PathBuf,
    pub set_name: String,
    pub records: Vec<RomAudit>,
    pub stats: AuditStats,
    pub status: SetStatus,
}

impl AuditReport {
    fn new(
        container_path: PathBuf,
        set_name: &str,
        records: Vec<RomAudit>,
        defs: &[RomDefinition],
    ) -> Self {
        let mut stats = AuditStats::default();
        let mut required = 0usize;
        let mut required_ok = 0usize;
        let mut required_found = 0usize;
        for (rec, def) in records.iter().zip(defs) {
            let status = rec.status();
            stats.add(status);
            if def.optional {
                stats.optional += 1;
                continue;
            }
            required += 1;
            if status == AuditStatus::Ok {
                required_ok += 1;
            }
            if status != AuditStatus::Missing {
                required_found += 1;
            }
        }
        let status = if required_ok == required {
            SetStatus::Complete
        } else if required_found == 0 {
            SetStatus::Missing
        } else {
            SetStatus::Partial
        };
        Self {
            container_path,
            set_name: set_name.to_string(),
            records,
            stats,
            status,
        }
    }

    /// Report for a set whose archive does not exist: everything missing.
    pub fn absent(container_path: impl Into<PathBuf>, set_name: &str, defs: &[RomDefinition]) -> Self {
        let container_path = container_path.into();
        let records = defs
            .iter()
            .map(|d| RomAudit::needed(container_path.clone(), d))
            .collect();
        Self::new(container_path, set_name, records, defs)
    }

    pub fn is_complete(&self) -> bool {
        self.status == SetStatus::Complete
    }
}

/// Audit one open archive against `defs`.
///
/// Each ROM is located by CRC first, then by any of its names ignoring
/// directories. A CRC of 0 marks an unknown dump and is matched by name only.
/// With data verification every candidate is tried in that order until one
/// decompresses cleanly; a ROM with no readable candidate is recorded
/// missing. Archive-level failures abort the audit.
pub fn audit_archive<R: Read + Seek>(
    reader: &mut ArchiveReader<R>,
    set_name: &str,
    defs: &[RomDefinition],
    policy: &Policy,
) -> Result<AuditReport> {
    let container = reader.path().to_path_buf();
    let mut records = Vec::with_capacity(defs.len());

    for def in defs {
        let mut rec = RomAudit::needed(container.clone(), def);
        let names = def.candidate_names();

        if policy.verify_data {
            let mut candidates = if def.crc != 0 {
                reader.find_all_by_crc(def.crc)?
            } else {
                Vec::new()
            };
            for e in reader.find_all_by_any_name(names.as_slice(), false)? {
                if !candidates.contains(&e) {
                    candidates.push(e);
                }
            }
            for entry in candidates {
                match reader.read_entry_at_to_vec(&entry) {
                    Ok(_) => {
                        rec.record_found(&entry);
                        break;
                    }
                    Err(e) if e.is_entry_error() => {
                        warn!(
                            archive = %container.display(),
                            entry = %entry.name,
                            error = %e,
                            "unreadable entry skipped"
                        );
                    }
                    Err(e) => return Err(e),
                }
            }
        } else {
            let by_crc = if def.crc != 0 {
                reader.find_by_crc(def.crc)?
            } else {
                None
            };
            let found = match by_crc {
                Some(e) => Some(e),
                None => reader.find_by_any_name(names.as_slice(), false)?,
            };
            if let Some(entry) = found {
                rec.record_found(&entry);
            }
        }
        debug!(set = set_name, "{}", rec);
        records.push(rec);
    }

    Ok(AuditReport::new(container, set_name, records, defs))
}

pub fn audit_path(
    archive: &Path,
    set_name: &str,
    defs: &[RomDefinition],
    policy: &Policy,
) -> Result<AuditReport> {
    let mut reader = ArchiveReader::open(archive)?.with_overflow(policy.overflow);
    audit_archive(&mut reader, set_name, defs, policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_set_is_missing_unless_empty() {
        let defs = vec![RomDefinition::new("a.bin", 4, 1), RomDefinition::new("b.bin", 4, 2)];
        let r = AuditReport::absent("x.zip", "x", &defs);
        assert_eq!(r.status, SetStatus::Missing);
        assert_eq!(r.stats.missing, 2);
        assert!(r.records.iter().all(|a| a.status() == AuditStatus::Missing));

        let empty = AuditReport::absent("y.zip", "y", &[]);
        assert!(empty.is_complete());
    }

    #[test]
    fn optional_roms_do_not_block_completion() {
        let mut opt = RomDefinition::new("opt.bin", 4, 9);
        opt.optional = true;
        let req = RomDefinition::new("req.bin", 4, 1);
        let defs = vec![req.clone(), opt.clone()];

        let mut found = RomAudit::needed("s.zip", &req);
        found.filename_found = "req.bin".into();
        found.length_found = 4;
        found.crc_found = 1;
        let records = vec![found, RomAudit::needed("s.zip", &opt)];

        let r = AuditReport::new("s.zip".into(), "s", records, &defs);
        assert_eq!(r.status, SetStatus::Complete);
        assert_eq!(r.stats.optional, 1);
        assert_eq!(r.stats.missing, 1);
    }

    #[test]
    fn bad_rom_makes_set_partial() {
        let defs = vec![RomDefinition::new("a.bin", 4, 1), RomDefinition::new("b.bin", 4, 2)];
        let mut bad = RomAudit::needed("s.zip", &defs[0]);
        bad.filename_found = "a.bin".into();
        bad.length_found = 4;
        bad.crc_found = 3;
        let records = vec![bad, RomAudit::needed("s.zip", &defs[1])];
        let r = AuditReport::new("s.zip".into(), "s", records, &defs);
        assert_eq!(r.status, SetStatus::Partial);
    }
}
