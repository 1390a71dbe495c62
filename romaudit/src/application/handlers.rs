use std::io::Write;
use std::path::PathBuf;

use romaudit_core::catalog::{Catalog, set_name_for};
use romaudit_core::error::{Result, RomAuditError};
use romaudit_core::stats::AuditStats;
use romaudit_core::util::hex::parse_crc;
use romaudit_core::{
    ArchiveEntry, ArchiveReader, AuditReport, OverflowPolicy, Policy, audit_path, extract, list,
    scan_directory,
};

fn policy_from_args(verify: bool) -> Policy {
    Policy {
        verify_data: verify,
        ..Default::default()
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| RomAuditError::Format(e.to_string()))
}

fn print_entry(e: &ArchiveEntry) {
    println!("{:08x}  {:>10} bytes  {}", e.crc, e.length, e.name);
}

fn print_report(report: &AuditReport) {
    println!(
        "[{}] {:?} ({})",
        report.set_name,
        report.status,
        report.container_path.display()
    );
    for rec in &report.records {
        println!("  {:<10} {}", rec.status().label(), rec);
    }
}

fn print_stats(stats: &AuditStats) {
    eprintln!(
        "ok={} bad-crc={} bad-length={} missing={} (optional {})",
        stats.ok, stats.bad_crc, stats.bad_length, stats.missing, stats.optional
    );
}

pub fn handle_list(archive: PathBuf) -> Result<()> {
    list(&archive)
}

pub fn handle_find(
    archive: PathBuf,
    crc_hex: Option<String>,
    names: Vec<String>,
    exact: bool,
) -> Result<()> {
    let mut reader = ArchiveReader::open(&archive)?;
    let hit = match crc_hex {
        Some(hex) => reader.find_by_crc(parse_crc(&hex)?)?,
        None => reader.find_by_any_name(names.as_slice(), exact)?,
    };
    match hit {
        Some(e) => print_entry(&e),
        None => eprintln!("find: no match in {}", archive.display()),
    }
    Ok(())
}

pub fn handle_cat(
    archive: PathBuf,
    crc_hex: String,
    max_len: Option<usize>,
    strict: bool,
) -> Result<()> {
    let crc = parse_crc(&crc_hex)?;
    let overflow = if strict {
        OverflowPolicy::Fail
    } else {
        OverflowPolicy::Truncate
    };
    let mut reader = ArchiveReader::open(&archive)?.with_overflow(overflow);
    let data = match max_len {
        Some(n) => {
            let mut buf = vec![0u8; n];
            let written = reader.read_entry(crc, &mut buf)?;
            buf.truncate(written);
            buf
        }
        None => reader.read_entry_to_vec(crc)?,
    };
    let mut out = std::io::stdout().lock();
    out.write_all(&data)?;
    out.flush()?;
    Ok(())
}

pub fn handle_extract(archive: PathBuf, crc_hex: String, dest: PathBuf) -> Result<()> {
    let crc = parse_crc(&crc_hex)?;
    let written = extract(&archive, crc, &dest)?;
    eprintln!("extract: wrote {}", written.display());
    Ok(())
}

pub fn handle_audit(
    archive: PathBuf,
    catalog: PathBuf,
    set: Option<String>,
    verify: bool,
    json: bool,
) -> Result<()> {
    let catalog = Catalog::load(&catalog)?;
    let set = set
        .or_else(|| set_name_for(&archive))
        .ok_or_else(|| RomAuditError::Format(format!("no set name for {}", archive.display())))?;
    let defs = catalog
        .set(&set)
        .ok_or_else(|| RomAuditError::Format(format!("set {set:?} is not in the catalog")))?;

    let report = audit_path(&archive, &set, defs, &policy_from_args(verify))?;
    if json {
        println!("{}", to_json(&report)?);
    } else {
        print_report(&report);
        print_stats(&report.stats);
    }
    Ok(())
}

pub fn handle_scan(dir: PathBuf, catalog: PathBuf, verify: bool, json: bool) -> Result<()> {
    let catalog = Catalog::load(&catalog)?;
    let results = scan_directory(&dir, &catalog, &policy_from_args(verify));

    if json {
        let rows: Vec<_> = results
            .iter()
            .map(|r| match &r.report {
                Ok(report) => serde_json::json!({
                    "set": r.set_name,
                    "archive": r.archive,
                    "report": report,
                }),
                Err(e) => serde_json::json!({
                    "set": r.set_name,
                    "archive": r.archive,
                    "error": e.to_string(),
                    "code": e.code(),
                }),
            })
            .collect();
        println!("{}", to_json(&rows)?);
        return Ok(());
    }

    let mut totals = AuditStats::default();
    let mut complete = 0usize;
    for r in &results {
        match &r.report {
            Ok(report) => {
                print_report(report);
                totals.merge(&report.stats);
                if report.is_complete() {
                    complete += 1;
                }
            }
            Err(e) => println!("[{}] error {}: {}", r.set_name, e.code(), e),
        }
    }
    eprintln!("scan: {complete}/{} sets complete", results.len());
    print_stats(&totals);
    Ok(())
}
