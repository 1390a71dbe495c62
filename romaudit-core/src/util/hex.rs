use crate::error::{Result, RomAuditError};
use hex;

/// Parse a CRC-32 written as hex, with or without a `0x` prefix.
/// Short forms are zero-extended (`abcd` == `0000abcd`).
pub fn parse_crc(hex_str: &str) -> Result<u32> {
    let s = hex_str.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if s.is_empty() || s.len() > 8 {
        return Err(RomAuditError::Format(format!(
            "expected 1 to 8 hex digits for a CRC, got {:?}",
            hex_str
        )));
    }
    let padded = format!("{s:0>8}");
    let mut out = [0u8; 4];
    hex::decode_to_slice(&padded, &mut out)
        .map_err(|e| RomAuditError::Format(format!("invalid hex {hex_str:?}: {e}")))?;
    Ok(u32::from_be_bytes(out))
}

pub fn format_crc(crc: u32) -> String {
    format!("0x{}", hex::encode(crc.to_be_bytes()))
}

/// Serde adapter: CRCs travel as hex strings in catalogs and reports.
pub mod crc_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(crc: &u32, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_crc(*crc))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u32, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_crc(&raw).map_err(serde::de::Error::custom)
    }
}
