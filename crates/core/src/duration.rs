//! Prometheus-style duration values (`30s`, `5m`, `1h30m`).
//!
//! Parsing goes through `humantime`, which accepts a superset of the
//! Prometheus syntax. Formatting always produces the compact Prometheus form
//! so serialized configuration stays readable by the dispatcher.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

const MS_PER_SECOND: u128 = 1000;
const MS_PER_MINUTE: u128 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u128 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u128 = 24 * MS_PER_HOUR;
const MS_PER_WEEK: u128 = 7 * MS_PER_DAY;
const MS_PER_YEAR: u128 = 365 * MS_PER_DAY;

/// A non-negative duration serialized as a Prometheus duration string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PromDuration(pub Duration);

impl PromDuration {
    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Nanosecond count, saturating at `u64::MAX`. This is the value folded
    /// into settings fingerprints.
    pub fn as_nanos_u64(&self) -> u64 {
        u64::try_from(self.0.as_nanos()).unwrap_or(u64::MAX)
    }
}

impl From<Duration> for PromDuration {
    fn from(d: Duration) -> Self {
        Self(d)
    }
}

impl fmt::Display for PromDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ms = self.0.as_millis();
        if ms == 0 {
            return f.write_str("0s");
        }

        // (unit, size, only emit when it divides evenly)
        let units: [(&str, u128, bool); 7] = [
            ("y", MS_PER_YEAR, false),
            ("w", MS_PER_WEEK, true),
            ("d", MS_PER_DAY, false),
            ("h", MS_PER_HOUR, false),
            ("m", MS_PER_MINUTE, false),
            ("s", MS_PER_SECOND, false),
            ("ms", 1, false),
        ];
        for (unit, size, exact) in units {
            if exact && ms % size != 0 {
                continue;
            }
            let count = ms / size;
            if count > 0 {
                write!(f, "{count}{unit}")?;
                ms -= count * size;
            }
        }
        Ok(())
    }
}

impl FromStr for PromDuration {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "0" {
            return Ok(Self::default());
        }
        let d = humantime::parse_duration(trimmed).map_err(|e| CoreError::InvalidDuration {
            value: trimmed.to_string(),
            reason: e.to_string(),
        })?;
        // Milliseconds are the smallest unit the dispatcher understands.
        if d.subsec_nanos() % 1_000_000 != 0 {
            return Err(CoreError::InvalidDuration {
                value: trimmed.to_string(),
                reason: "duration must be a whole number of milliseconds".into(),
            });
        }
        Ok(Self(d))
    }
}

impl Serialize for PromDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PromDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn formats_compact_prometheus_style() {
        assert_eq!(PromDuration::from_secs(0).to_string(), "0s");
        assert_eq!(PromDuration::from_secs(30).to_string(), "30s");
        assert_eq!(PromDuration::from_secs(300).to_string(), "5m");
        assert_eq!(PromDuration::from_secs(5400).to_string(), "1h30m");
        assert_eq!(PromDuration::from_secs(14 * 86_400).to_string(), "2w");
        assert_eq!(PromDuration::from_secs(10 * 86_400).to_string(), "10d");
        assert_eq!(
            PromDuration(Duration::from_millis(1500)).to_string(),
            "1s500ms"
        );
    }

    #[test]
    fn parses_common_forms() {
        assert_eq!("30s".parse::<PromDuration>().unwrap(), PromDuration::from_secs(30));
        assert_eq!("5m".parse::<PromDuration>().unwrap(), PromDuration::from_secs(300));
        assert_eq!("4h".parse::<PromDuration>().unwrap(), PromDuration::from_secs(14_400));
        assert_eq!("0".parse::<PromDuration>().unwrap(), PromDuration::default());
    }

    #[test]
    fn rejects_unknown_units() {
        assert_matches!(
            "10 parsecs".parse::<PromDuration>(),
            Err(CoreError::InvalidDuration { .. })
        );
    }

    #[test]
    fn rejects_sub_millisecond_precision() {
        assert_matches!(
            "500us".parse::<PromDuration>(),
            Err(CoreError::InvalidDuration { value, .. }) if value == "500us"
        );
        assert_matches!(
            "1s 10ns".parse::<PromDuration>(),
            Err(CoreError::InvalidDuration { .. })
        );
        assert!(serde_json::from_str::<PromDuration>("\"250us\"").is_err());

        let ms: PromDuration = "1s 500ms".parse().unwrap();
        assert_eq!(ms.to_string().parse::<PromDuration>().unwrap(), ms);
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&PromDuration::from_secs(90)).unwrap();
        assert_eq!(json, "\"1m30s\"");
        let back: PromDuration = serde_json::from_str("\"90s\"").unwrap();
        assert_eq!(back, PromDuration::from_secs(90));
    }
}
