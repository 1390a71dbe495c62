use serde::{Deserialize, Serialize};

/// What `read_entry` does when the caller's buffer is shorter than the entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Fill the buffer, return its length, log a warning.
    #[default]
    Truncate,
    /// Reject the read before decompressing anything.
    Fail,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Policy {
    pub overflow: OverflowPolicy,
    /// Decompress every located ROM during an audit; unreadable entries count as missing.
    pub verify_data: bool,
}
