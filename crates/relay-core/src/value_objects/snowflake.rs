//! Snowflake ID - 64-bit time-ordered message identifier
//!
//! Layout:
//! - Bits 63-22: milliseconds since `Snowflake::EPOCH`
//! - Bits 21-12: worker ID (0-1023)
//! - Bits 11-0:  per-millisecond sequence (0-4095)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const TIMESTAMP_SHIFT: u32 = 22;
const WORKER_SHIFT: u32 = 12;
const WORKER_MASK: i64 = 0x3FF;
const SEQUENCE_MASK: i64 = 0xFFF;

/// Time-ordered 64-bit identifier assigned to stored chat messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Custom epoch: 2024-01-01 00:00:00 UTC (milliseconds)
    pub const EPOCH: i64 = 1_704_067_200_000;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Milliseconds since the Unix epoch encoded in the id
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> TIMESTAMP_SHIFT) + Self::EPOCH
    }

    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> WORKER_SHIFT) & WORKER_MASK) as u16
    }

    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.parse::<i64>()
            .map(Snowflake)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
    }
}

/// Error when parsing a Snowflake from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// JSON clients get a string so 64-bit ids survive JavaScript number precision
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(v) => Ok(Snowflake(v)),
            Raw::Str(s) => Snowflake::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Lock-free Snowflake generator
///
/// Ids from one generator are strictly increasing. When more than 4096 ids
/// are requested within one millisecond the timestamp part borrows from the
/// next millisecond instead of blocking.
pub struct SnowflakeGenerator {
    worker_bits: i64,
    last: AtomicI64,
}

impl SnowflakeGenerator {
    /// Largest accepted worker id
    pub const MAX_WORKER_ID: u16 = 1023;

    /// Create a new generator with the given worker ID
    ///
    /// # Panics
    /// Panics if `worker_id` exceeds `MAX_WORKER_ID`.
    pub fn new(worker_id: u16) -> Self {
        assert!(
            worker_id <= Self::MAX_WORKER_ID,
            "Worker ID must be < 1024"
        );
        Self {
            worker_bits: i64::from(worker_id) << WORKER_SHIFT,
            last: AtomicI64::new(0),
        }
    }

    pub fn generate(&self) -> Snowflake {
        let now = ((current_millis() - Snowflake::EPOCH).max(0) << TIMESTAMP_SHIFT) | self.worker_bits;
        let step = |last: i64| self.successor(last, now);

        // fetch_update only fails when the closure returns None
        let prev = match self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(step(last)))
        {
            Ok(prev) | Err(prev) => prev,
        };

        Snowflake::new(step(prev))
    }

    fn successor(&self, last: i64, now: i64) -> i64 {
        if now > last {
            now
        } else if last & SEQUENCE_MASK == SEQUENCE_MASK {
            (((last >> TIMESTAMP_SHIFT) + 1) << TIMESTAMP_SHIFT) | self.worker_bits
        } else {
            last + 1
        }
    }

    pub fn worker_id(&self) -> u16 {
        (self.worker_bits >> WORKER_SHIFT) as u16
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for SnowflakeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeGenerator")
            .field("worker_id", &self.worker_id())
            .finish()
    }
}

fn current_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
