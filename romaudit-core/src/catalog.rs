use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::RomDefinition;
use crate::error::{Result, RomAuditError};

/// ROM-set definitions keyed by set name (the archive's file stem).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub sets: BTreeMap<String, Vec<RomDefinition>>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
            .map_err(|e| RomAuditError::Format(format!("catalog {}: {e}", path.display())))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| RomAuditError::Format(e.to_string()))
    }

    pub fn set(&self, name: &str) -> Option<&[RomDefinition]> {
        self.sets.get(name).map(Vec::as_slice)
    }
}

/// Set name for an archive path: `roms/sf2.zip` -> `sf2`.
pub fn set_name_for(archive: &Path) -> Option<String> {
    archive
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "sets": {
            "sf2": [
                { "name": "sf2_30a.bin", "length": 131072, "crc": "0x57bd7051" },
                { "name": "sf2.key", "aliases": ["sf2_key.bin"], "length": 16,
                  "crc": "abcd", "rom_type": 4, "optional": true }
            ]
        }
    }"#;

    #[test]
    fn parses_sets_with_defaults() {
        let cat = Catalog::from_json(SAMPLE).unwrap();
        let sf2 = cat.set("sf2").unwrap();
        assert_eq!(sf2.len(), 2);
        assert_eq!(sf2[0].crc, 0x57bd_7051);
        assert_eq!(sf2[0].rom_type, 0);
        assert!(!sf2[0].optional);
        assert_eq!(sf2[1].crc, 0xabcd);
        assert_eq!(sf2[1].candidate_names(), vec!["sf2.key", "sf2_key.bin"]);
        assert!(sf2[1].optional);
        assert!(cat.set("mslug").is_none());
    }

    #[test]
    fn bad_crc_is_a_format_error() {
        let err = Catalog::from_json(
            r#"{"sets":{"x":[{"name":"a","length":1,"crc":"nothex"}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RomAuditError::Format(_)));
    }

    #[test]
    fn set_name_is_file_stem() {
        assert_eq!(set_name_for(Path::new("roms/sf2.zip")).as_deref(), Some("sf2"));
    }
}
