use serde::{Deserialize, Serialize};

use crate::audit::record::AuditStatus;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    pub ok: u64,
    pub bad_crc: u64,
    pub bad_length: u64,
    pub missing: u64,
    /// records for optional ROMs, whatever their status
    pub optional: u64,
}

impl AuditStats {
    pub fn add(&mut self, status: AuditStatus) {
        match status {
            AuditStatus::Ok => self.ok += 1,
            AuditStatus::BadCrc => self.bad_crc += 1,
            AuditStatus::BadLength => self.bad_length += 1,
            AuditStatus::Missing => self.missing += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.ok + self.bad_crc + self.bad_length + self.missing
    }

    pub fn merge(&mut self, other: &AuditStats) {
        self.ok += other.ok;
        self.bad_crc += other.bad_crc;
        self.bad_length += other.bad_length;
        self.missing += other.missing;
        self.optional += other.optional;
    }
}
