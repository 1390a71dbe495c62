// romaudit_core/src/domain.rs
use serde::{Deserialize, Serialize};

/// One file inside an open archive, as listed from the central directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub name: String,
    pub length: u64,
    pub crc: u32,
    pub compressed_length: u64,
    /// central directory index; only valid for the session that listed it
    #[serde(skip)]
    pub(crate) index: usize,
}

impl ArchiveEntry {
    /// File name without any directory prefix.
    pub fn basename(&self) -> &str {
        basename(&self.name)
    }
}

/// A ROM file some set expects to find.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RomDefinition {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub length: u64,
    #[serde(with = "crate::util::hex::crc_serde")]
    pub crc: u32,
    #[serde(default)]
    pub rom_type: u32,
    #[serde(default)]
    pub optional: bool,
}

impl RomDefinition {
    pub fn new(name: impl Into<String>, length: u64, crc: u32) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            length,
            crc,
            rom_type: 0,
            optional: false,
        }
    }

    /// Primary name followed by aliases, in lookup order.
    pub fn candidate_names(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .collect()
    }
}

pub(crate) fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
