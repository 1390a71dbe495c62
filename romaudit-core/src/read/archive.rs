use crate::domain::ArchiveEntry;
use crate::error::{Result, RomAuditError};
use crate::policy::OverflowPolicy;
use crate::read::lookup::name_matches;
use std::{
    fs::File,
    io::{ErrorKind, Read, Seek},
    path::{Path, PathBuf},
};
use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipError;

/// An open zip container.
///
/// The file handle and the zip session live exactly as long as this value.
/// Listing is done once and cached; the container is assumed not to change
/// while the session is open. Not meant to be shared across threads; open
/// one reader per worker instead.
pub struct ArchiveReader<R = File> {
    path: PathBuf,
    zip: ZipArchive<R>,
    entries: Option<Vec<ArchiveEntry>>,
    overflow: OverflowPolicy,
}

impl ArchiveReader<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let f = File::open(path).map_err(|e| RomAuditError::ArchiveLoad {
            path: path.to_path_buf(),
            source: ZipError::Io(e),
        })?;
        Self::from_reader(path, f)
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Open a session over any seekable source. `path` only labels errors and reports.
    pub fn from_reader(path: impl Into<PathBuf>, reader: R) -> Result<Self> {
        let path = path.into();
        // on failure `reader` is dropped inside ZipArchive::new
        let zip = ZipArchive::new(reader).map_err(|source| RomAuditError::ArchiveLoad {
            path: path.clone(),
            source,
        })?;
        debug!(archive = %path.display(), records = zip.len(), "opened archive");
        Ok(Self {
            path,
            zip,
            entries: None,
            overflow: OverflowPolicy::default(),
        })
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All file entries of the archive. Directories are skipped.
    ///
    /// `zip` parses the central directory at open time; listing then visits
    /// each record's local header, and a damaged one is reported as
    /// `ArchiveNavigation`.
    pub fn entries(&mut self) -> Result<&[ArchiveEntry]> {
        if self.entries.is_none() {
            let listed = self.list_entries()?;
            self.entries = Some(listed);
        }
        Ok(self.entries.get_or_insert_with(Vec::new).as_slice())
    }

    fn list_entries(&mut self) -> Result<Vec<ArchiveEntry>> {
        let mut out = Vec::with_capacity(self.zip.len());
        for index in 0..self.zip.len() {
            let zf = self
                .zip
                .by_index_raw(index)
                .map_err(|source| RomAuditError::ArchiveNavigation {
                    path: self.path.clone(),
                    source,
                })?;
            if zf.is_dir() {
                continue;
            }
            out.push(ArchiveEntry {
                name: zf.name().to_string(),
                length: zf.size(),
                crc: zf.crc32(),
                compressed_length: zf.compressed_size(),
                index,
            });
        }
        debug!(archive = %self.path.display(), files = out.len(), "listed archive");
        Ok(out)
    }

    pub fn entry_count(&mut self) -> Result<usize> {
        Ok(self.entries()?.len())
    }

    pub fn find_by_crc(&mut self, crc: u32) -> Result<Option<ArchiveEntry>> {
        Ok(self.entries()?.iter().find(|e| e.crc == crc).cloned())
    }

    /// Every entry with checksum `crc`, in directory order.
    pub fn find_all_by_crc(&mut self, crc: u32) -> Result<Vec<ArchiveEntry>> {
        Ok(self
            .entries()?
            .iter()
            .filter(|e| e.crc == crc)
            .cloned()
            .collect())
    }

    /// With `exact_path` the whole stored path must match; otherwise only the
    /// file names are compared, ignoring directories on both sides.
    pub fn find_by_name(&mut self, name: &str, exact_path: bool) -> Result<Option<ArchiveEntry>> {
        Ok(self
            .entries()?
            .iter()
            .find(|e| name_matches(&e.name, name, exact_path))
            .cloned())
    }

    /// First candidate (in the given order) that is present wins.
    pub fn find_by_any_name<S: AsRef<str>>(
        &mut self,
        names: &[S],
        exact_path: bool,
    ) -> Result<Option<ArchiveEntry>> {
        for name in names {
            if let Some(e) = self.find_by_name(name.as_ref(), exact_path)? {
                return Ok(Some(e));
            }
        }
        Ok(None)
    }

    /// Every entry matching any candidate, candidates first, then directory
    /// order. An entry matching several candidates appears once.
    pub fn find_all_by_any_name<S: AsRef<str>>(
        &mut self,
        names: &[S],
        exact_path: bool,
    ) -> Result<Vec<ArchiveEntry>> {
        let entries = self.entries()?;
        let mut out: Vec<ArchiveEntry> = Vec::new();
        for name in names {
            for e in entries
                .iter()
                .filter(|e| name_matches(&e.name, name.as_ref(), exact_path))
            {
                if !out.iter().any(|o| o.index == e.index) {
                    out.push(e.clone());
                }
            }
        }
        Ok(out)
    }

    /// Decompress the entry with checksum `crc` into `buf`, returning the
    /// number of bytes written.
    ///
    /// A buffer larger than the entry receives exactly the entry's bytes and
    /// the zip library checks the CRC. A shorter buffer is handled per the
    /// reader's [`OverflowPolicy`]; truncated reads are not CRC-checked.
    pub fn read_entry(&mut self, crc: u32, buf: &mut [u8]) -> Result<usize> {
        let entry = self
            .find_by_crc(crc)?
            .ok_or_else(|| RomAuditError::CompressedFileOpen {
                name: format!("crc {crc:08x}"),
                source: ZipError::FileNotFound,
            })?;
        self.read_entry_at(&entry, buf)
    }

    /// Same as [`read_entry`](Self::read_entry) for one specific listed entry,
    /// which matters when several entries share a checksum.
    pub(crate) fn read_entry_at(&mut self, entry: &ArchiveEntry, buf: &mut [u8]) -> Result<usize> {
        let truncated = (buf.len() as u64) < entry.length;
        if truncated && self.overflow == OverflowPolicy::Fail {
            return Err(RomAuditError::CompressedFileRead {
                name: entry.name.clone(),
                source: std::io::Error::new(
                    ErrorKind::InvalidInput,
                    format!(
                        "buffer holds {} bytes, entry needs {}",
                        buf.len(),
                        entry.length
                    ),
                ),
            });
        }

        let mut zf =
            self.zip
                .by_index(entry.index)
                .map_err(|source| RomAuditError::CompressedFileOpen {
                    name: entry.name.clone(),
                    source,
                })?;

        let read_err = |source: std::io::Error| RomAuditError::CompressedFileRead {
            name: entry.name.clone(),
            source,
        };

        let mut written = 0usize;
        let mut eof = false;
        while written < buf.len() {
            match zf.read(&mut buf[written..]) {
                Ok(0) => {
                    eof = true;
                    break;
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(read_err(e)),
            }
        }

        if truncated {
            warn!(
                archive = %self.path.display(),
                entry = %entry.name,
                wanted = entry.length,
                written,
                "entry truncated to fit buffer"
            );
        } else if !eof {
            // the CRC check fires on the read that reports end of data
            let mut tail = [0u8; 1];
            loop {
                match zf.read(&mut tail) {
                    Ok(0) => break,
                    Ok(_) => {
                        return Err(read_err(std::io::Error::new(
                            ErrorKind::InvalidData,
                            "entry longer than its recorded size",
                        )));
                    }
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(read_err(e)),
                }
            }
        }

        if !truncated && (written as u64) != entry.length {
            return Err(read_err(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("got {written} of {} bytes", entry.length),
            )));
        }
        Ok(written)
    }

    /// Whole entry as a fresh vector sized from the central directory.
    pub fn read_entry_to_vec(&mut self, crc: u32) -> Result<Vec<u8>> {
        let entry = self
            .find_by_crc(crc)?
            .ok_or_else(|| RomAuditError::CompressedFileOpen {
                name: format!("crc {crc:08x}"),
                source: ZipError::FileNotFound,
            })?;
        self.read_entry_at_to_vec(&entry)
    }

    pub(crate) fn read_entry_at_to_vec(&mut self, entry: &ArchiveEntry) -> Result<Vec<u8>> {
        let mut buf = entry_buffer(entry.length, &entry.name)?;
        let n = self.read_entry_at(entry, &mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// Zeroed buffer for an entry whose size comes from the (untrusted) central
/// directory. Sizes the platform or allocator cannot hold are read errors.
pub(crate) fn entry_buffer(length: u64, name: &str) -> Result<Vec<u8>> {
    let too_big = |why: String| RomAuditError::CompressedFileRead {
        name: name.to_string(),
        source: std::io::Error::new(ErrorKind::OutOfMemory, why),
    };
    let len = usize::try_from(length)
        .map_err(|_| too_big(format!("entry size {length} exceeds address space")))?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| too_big(format!("cannot allocate {length} bytes: {e}")))?;
    buf.resize(len, 0);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_entry_buffer_is_a_read_error() {
        let err = entry_buffer(u64::MAX, "huge.bin").unwrap_err();
        assert!(matches!(err, RomAuditError::CompressedFileRead { .. }));
        assert_eq!(err.code(), -103);
    }

    #[test]
    fn entry_buffer_is_zeroed_to_length() {
        let buf = entry_buffer(16, "small.bin").unwrap();
        assert_eq!(buf, vec![0u8; 16]);
    }
}
