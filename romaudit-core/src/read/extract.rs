use crate::error::{Result, RomAuditError};
use crate::policy::OverflowPolicy;
use crate::read::archive::ArchiveReader;

use std::fs;
use std::path::{Path, PathBuf};
use zip::result::ZipError;

/// Decompress the entry with checksum `crc` into `dest`, named after the
/// entry's file name. Returns the written path.
pub fn extract(archive: &Path, crc: u32, dest: &Path) -> Result<PathBuf> {
    let mut reader = ArchiveReader::open(archive)?.with_overflow(OverflowPolicy::Fail);
    let entry = reader
        .find_by_crc(crc)?
        .ok_or_else(|| RomAuditError::CompressedFileOpen {
            name: format!("crc {crc:08x}"),
            source: ZipError::FileNotFound,
        })?;
    let data = reader.read_entry_to_vec(crc)?;

    let outp = safe_join(dest, entry.basename())?;
    fs::create_dir_all(dest)?;
    fs::write(&outp, &data)?;
    Ok(outp)
}

fn safe_join(root: &Path, rel: &str) -> Result<PathBuf> {
    let p = Path::new(rel);
    if rel.is_empty() || rel == "." || rel == ".." || p.is_absolute() {
        return Err(RomAuditError::Format(format!("unsafe entry name: {rel}")));
    }
    Ok(root.join(p))
}
