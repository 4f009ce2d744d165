//! Signed hour offsets relative to landfall, written as `T-120h` / `T+0h`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Signed number of hours from the reference instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HourOffset(pub i32);

impl HourOffset {
    pub fn hours(self) -> i32 {
        self.0
    }

    pub fn plus(self, hours: i32) -> HourOffset {
        HourOffset(self.0 + hours)
    }
}

impl fmt::Display for HourOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{:+}h", self.0)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseHourOffsetError(String);

impl fmt::Display for ParseHourOffsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hour offset: {:?}", self.0)
    }
}

impl std::error::Error for ParseHourOffsetError {}

impl FromStr for HourOffset {
    type Err = ParseHourOffsetError;

    /// Accepts `T-12h`, `t+6H`, `-12h`, `+6` and bare integers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let t = t.strip_prefix(['T', 't']).unwrap_or(t);
        let t = t.strip_suffix(['h', 'H']).unwrap_or(t);
        t.trim()
            .parse::<i32>()
            .map(HourOffset)
            .map_err(|_| ParseHourOffsetError(s.to_string()))
    }
}

impl Serialize for HourOffset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HourOffset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Hours(i64),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
            Raw::Hours(h) => i32::try_from(h)
                .map(HourOffset)
                .map_err(|_| serde::de::Error::custom("hour offset out of range")),
        }
    }
}
