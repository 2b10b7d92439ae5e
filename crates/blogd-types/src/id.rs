use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Raw identifier length in bytes.
pub const DOCUMENT_ID_LEN: usize = 12;

/// Length of the wire (hex) form.
pub const DOCUMENT_ID_HEX_LEN: usize = DOCUMENT_ID_LEN * 2;

const COUNTER_MASK: u32 = 0x00ff_ffff;

static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();

/// Store-generated identifier for a document.
///
/// Layout: 4-byte big-endian creation time in seconds, 5 bytes unique to the
/// generating process, and a 3-byte big-endian counter. Ids generated by one
/// process within the same second are distinct until the counter wraps.
///
/// The wire form is exactly [`DOCUMENT_ID_HEX_LEN`] lowercase hex characters.
/// [`DocumentId::from_hex`] accepts nothing else, so every string it accepts
/// is the encoding of exactly one id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId([u8; DOCUMENT_ID_LEN]);

impl DocumentId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        let process = PROCESS_UNIQUE.get_or_init(rand::random::<[u8; 5]>);
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK))
            .fetch_add(1, Ordering::Relaxed)
            & COUNTER_MASK;

        let mut bytes = [0u8; DOCUMENT_ID_LEN];
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process);
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self(bytes)
    }

    /// Create a `DocumentId` from raw bytes.
    pub const fn from_raw(bytes: [u8; DOCUMENT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// The null id (all zeros). Never assigned by a store.
    pub const fn null() -> Self {
        Self([0u8; DOCUMENT_ID_LEN])
    }

    /// Returns `true` if this is the null id.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; DOCUMENT_ID_LEN]
    }

    /// The raw 12 bytes.
    pub fn as_bytes(&self) -> &[u8; DOCUMENT_ID_LEN] {
        &self.0
    }

    /// Creation time embedded in the id, to one-second precision.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(secs), 0).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Wire encoding: 24 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the wire encoding.
    ///
    /// Input arrives from clients, so every malformed string must come back
    /// as an error: empty input, wrong length, uppercase digits, and any
    /// non-hex character are all rejected.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() {
            return Err(TypeError::Empty);
        }
        if s.len() != DOCUMENT_ID_HEX_LEN {
            return Err(TypeError::InvalidLength {
                expected: DOCUMENT_ID_HEX_LEN,
                actual: s.len(),
            });
        }
        if let Some(c) = s.chars().find(|c| !matches!(c, '0'..='9' | 'a'..='f')) {
            return Err(TypeError::InvalidHex(format!("unexpected character {c:?}")));
        }
        let mut arr = [0u8; DOCUMENT_ID_LEN];
        hex::decode_to_slice(s, &mut arr).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.to_hex())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; DOCUMENT_ID_LEN]> for DocumentId {
    fn from(bytes: [u8; DOCUMENT_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
