//! Serde helpers for civil wall-clock values
//!
//! 时间统一以 `HH:MM` 存储（不带秒、不带时区）。

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

/// 解析 `HH:MM`，兼容 `HH:MM:SS`
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// `NaiveTime` <-> `"HH:MM"`
pub mod hhmm {
    use super::*;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_hhmm(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time (HH:MM): {}", raw)))
    }
}

/// `Option<NaiveTime>` <-> `"HH:MM"` / null
pub mod hhmm_option {
    use super::*;

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_some(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse_hhmm(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid time (HH:MM): {}", raw))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq)]
    struct Window {
        #[serde(with = "hhmm")]
        at: NaiveTime,
        #[serde(default, with = "hhmm_option")]
        until: Option<NaiveTime>,
    }

    #[test]
    fn test_hhmm_drops_seconds() {
        let window = Window {
            at: NaiveTime::from_hms_opt(19, 0, 42).unwrap(),
            until: None,
        };
        let json = serde_json::to_string(&window).unwrap();
        assert_eq!(json, r#"{"at":"19:00","until":null}"#);
    }

    #[test]
    fn test_hhmm_accepts_seconds_on_input() {
        let window: Window = serde_json::from_str(r#"{"at":"07:30:00","until":"23:00"}"#).unwrap();
        assert_eq!(window.at, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(window.until, NaiveTime::from_hms_opt(23, 0, 0));
    }

    #[test]
    fn test_hhmm_rejects_garbage() {
        assert!(serde_json::from_str::<Window>(r#"{"at":"7pm"}"#).is_err());
        assert!(serde_json::from_str::<Window>(r#"{"at":"25:00"}"#).is_err());
    }
}
