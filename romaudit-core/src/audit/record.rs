use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::domain::{ArchiveEntry, RomDefinition};
use crate::util::hex::format_crc;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AuditStatus {
    Ok = 0,
    BadCrc = 1,
    BadLength = 2,
    Missing = 3,
}

impl AuditStatus {
    pub fn label(self) -> &'static str {
        match self {
            AuditStatus::Ok => "ok",
            AuditStatus::BadCrc => "bad-crc",
            AuditStatus::BadLength => "bad-length",
            AuditStatus::Missing => "missing",
        }
    }
}

/// Expected vs. found identity of one ROM file.
///
/// Callers fill the fields; `status` and `message` are computed from them on
/// every call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RomAudit {
    pub container_path: PathBuf,
    pub filename_needed: String,
    pub length_needed: u64,
    pub crc_needed: u32,
    pub filename_found: String,
    pub length_found: u64,
    pub crc_found: u32,
    /// caller-defined tag, e.g. program ROM vs. graphics
    pub rom_type: u32,
}

impl RomAudit {
    /// Record for `def` with nothing found yet.
    pub fn needed(container_path: impl Into<PathBuf>, def: &RomDefinition) -> Self {
        Self {
            container_path: container_path.into(),
            filename_needed: def.name.clone(),
            length_needed: def.length,
            crc_needed: def.crc,
            rom_type: def.rom_type,
            ..Default::default()
        }
    }

    pub fn record_found(&mut self, entry: &ArchiveEntry) {
        self.filename_found = entry.name.clone();
        self.length_found = entry.length;
        self.crc_found = entry.crc;
    }

    pub fn clear_found(&mut self) {
        self.filename_found.clear();
        self.length_found = 0;
        self.crc_found = 0;
    }

    /// Missing wins over content mismatches; length is checked before CRC.
    pub fn status(&self) -> AuditStatus {
        if self.filename_found.is_empty() {
            AuditStatus::Missing
        } else if self.length_found != self.length_needed {
            AuditStatus::BadLength
        } else if self.crc_found != self.crc_needed {
            AuditStatus::BadCrc
        } else {
            AuditStatus::Ok
        }
    }

    pub fn message(&self) -> String {
        let name = &self.filename_needed;
        match self.status() {
            AuditStatus::Ok => format!("{name}: OK"),
            AuditStatus::Missing => format!("{name}: missing"),
            AuditStatus::BadLength => format!(
                "{name}: length mismatch (expected {} bytes, found {})",
                self.length_needed, self.length_found
            ),
            AuditStatus::BadCrc => format!(
                "{name}: CRC mismatch (expected {}, found {})",
                format_crc(self.crc_needed),
                format_crc(self.crc_found)
            ),
        }
    }
}

impl fmt::Display for RomAudit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

// Reports carry the derived fields next to the raw ones.
impl Serialize for RomAudit {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = s.serialize_struct("RomAudit", 10)?;
        st.serialize_field("container_path", &self.container_path)?;
        st.serialize_field("filename_needed", &self.filename_needed)?;
        st.serialize_field("length_needed", &self.length_needed)?;
        st.serialize_field("crc_needed", &format_crc(self.crc_needed))?;
        st.serialize_field("filename_found", &self.filename_found)?;
        st.serialize_field("length_found", &self.length_found)?;
        st.serialize_field("crc_found", &format_crc(self.crc_found))?;
        st.serialize_field("rom_type", &self.rom_type)?;
        st.serialize_field("status", &self.status())?;
        st.serialize_field("message", &self.message())?;
        st.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn needing(name: &str, length: u64, crc: u32) -> RomAudit {
        RomAudit::needed("set.zip", &RomDefinition::new(name, length, crc))
    }

    fn found(mut a: RomAudit, name: &str, length: u64, crc: u32) -> RomAudit {
        a.filename_found = name.into();
        a.length_found = length;
        a.crc_found = crc;
        a
    }

    #[test]
    fn game_bin_scenario() {
        let ok = found(needing("game.bin", 1024, 0xabcd), "game.bin", 1024, 0xabcd);
        assert_eq!(ok.status(), AuditStatus::Ok);
        assert_eq!(ok.message(), "game.bin: OK");

        let bad = found(needing("game.bin", 1024, 0x1234), "game.bin", 1024, 0xabcd);
        assert_eq!(bad.status(), AuditStatus::BadCrc);
        assert_eq!(
            bad.message(),
            "game.bin: CRC mismatch (expected 0x00001234, found 0x0000abcd)"
        );

        let missing = needing("missing.bin", 512, 0);
        assert_eq!(missing.status(), AuditStatus::Missing);
        assert_eq!(missing.to_string(), "missing.bin: missing");
    }

    #[test]
    fn missing_takes_precedence() {
        // found length/crc set but no name: still missing
        let mut a = needing("a.bin", 16, 1);
        a.length_found = 99;
        a.crc_found = 7;
        assert_eq!(a.status(), AuditStatus::Missing);
    }

    #[test]
    fn length_checked_before_crc() {
        let a = found(needing("a.bin", 16, 1), "a.bin", 8, 2);
        assert_eq!(a.status(), AuditStatus::BadLength);
        assert_eq!(
            a.message(),
            "a.bin: length mismatch (expected 16 bytes, found 8)"
        );
    }

    #[test]
    fn ok_only_when_everything_matches() {
        let cases = [
            (16, 1, AuditStatus::Ok),
            (17, 1, AuditStatus::BadLength),
            (16, 2, AuditStatus::BadCrc),
            (15, 3, AuditStatus::BadLength),
        ];
        for (len, crc, want) in cases {
            let a = found(needing("a.bin", 16, 1), "renamed.bin", len, crc);
            assert_eq!(a.status(), want, "len={len} crc={crc}");
        }
    }

    #[test]
    fn clear_found_resets_to_missing() {
        let mut a = found(needing("a.bin", 16, 1), "a.bin", 16, 1);
        a.clear_found();
        assert_eq!(a.status(), AuditStatus::Missing);
        assert_eq!(a.length_found, 0);
    }

    #[test]
    fn status_discriminants_are_stable() {
        assert_eq!(AuditStatus::Ok as u8, 0);
        assert_eq!(AuditStatus::BadCrc as u8, 1);
        assert_eq!(AuditStatus::BadLength as u8, 2);
        assert_eq!(AuditStatus::Missing as u8, 3);
    }
}
