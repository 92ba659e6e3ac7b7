use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Random bytes identifying this process, shared by every id it generates.
static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(rand::random);

/// Per-process counter; only the low 24 bits are used.
static COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(rand::random::<u32>() & 0x00ff_ffff));

/// The store-native identifier of a product.
///
/// Twelve bytes: a big-endian creation timestamp in seconds, five bytes of
/// process-unique randomness and a big-endian 24-bit counter. The text form
/// is exactly 24 hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

/// Returned when a string is not a well-formed `ObjectId`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0:?} is not a 24 character hex identifier")]
pub struct ParseObjectIdError(pub String);

impl ObjectId {
    /// Generates a fresh identifier stamped with the current time.
    pub fn new() -> Self {
        let seconds = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Parses the 24 hex digit text form.
    pub fn parse_str(s: &str) -> Result<Self, ParseObjectIdError> {
        if s.len() != 24 {
            return Err(ParseObjectIdError(s.to_string()));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ParseObjectIdError(s.to_string()))?;
        Ok(Self(bytes))
    }

    /// Rebuilds an identifier from its raw stored bytes.
    pub fn from_slice(raw: &[u8]) -> Option<Self> {
        <[u8; 12]>::try_from(raw).ok().map(Self)
    }

    pub fn bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// The second at which this identifier was generated.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let seconds = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        Utc.timestamp_opt(seconds as i64, 0)
            .single()
            .unwrap_or_default()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = ParseObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s).map_err(de::Error::custom)
    }
}
