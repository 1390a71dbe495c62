use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::audit::auditor::{AuditReport, audit_path};
use crate::catalog::{Catalog, set_name_for};
use crate::error::Result;
use crate::policy::Policy;

/// Outcome of auditing one set during a directory scan.
#[derive(Debug)]
pub struct ScanEntry {
    pub set_name: String,
    pub archive: PathBuf,
    pub report: Result<AuditReport>,
}

/// Every `*.zip` below `dir`, sorted by path.
pub fn discover_archives(dir: &Path) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
        })
        .collect();
    out.sort();
    out
}

/// Audit every catalog set against the archives found under `dir`.
///
/// Archives are audited in parallel, each on its own session. Sets without
/// an archive are reported missing; a broken archive fails only its own set.
/// Archives that no catalog set names are ignored.
pub fn scan_directory(dir: &Path, catalog: &Catalog, policy: &Policy) -> Vec<ScanEntry> {
    let mut by_set = std::collections::BTreeMap::new();
    for path in discover_archives(dir) {
        let Some(set) = set_name_for(&path) else {
            continue;
        };
        if !catalog.sets.contains_key(&set) {
            continue;
        }
        // first archive (in path order) for a set wins
        by_set.entry(set).or_insert(path);
    }

    let mut results: Vec<ScanEntry> = catalog
        .sets
        .par_iter()
        .map(|(set, defs)| {
            let (archive, report) = match by_set.get(set) {
                Some(path) => {
                    let report = audit_path(path, set, defs, policy);
                    match &report {
                        Ok(r) => info!(set = %set, status = ?r.status, "audited"),
                        Err(e) => warn!(set = %set, error = %e, "audit failed"),
                    }
                    (path.clone(), report)
                }
                None => {
                    let path = dir.join(format!("{set}.zip"));
                    (path.clone(), Ok(AuditReport::absent(path, set, defs)))
                }
            };
            ScanEntry {
                set_name: set.clone(),
                archive,
                report,
            }
        })
        .collect();
    results.sort_by(|a, b| a.set_name.cmp(&b.set_name));
    results
}
