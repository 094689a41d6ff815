use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ValidationError;

/// Architectural layer an event originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Layer {
    Cli,
    Domain,
    Infra,
    System,
}

impl Layer {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cli => "CLI",
            Self::Domain => "DOMAIN",
            Self::Infra => "INFRA",
            Self::System => "SYSTEM",
        }
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event severity. Ordered from least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl TraceLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Level declared under the `level` key of event metadata.
    ///
    /// Missing or unrecognized values count as `info`.
    pub fn declared_in(data: &Map<String, Value>) -> Self {
        data.get("level")
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

impl Display for TraceLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraceLevel {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(ValidationError::InvalidLevel {
                value: value.to_owned(),
            }),
        }
    }
}

/// One trace-log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub ts: String,
    pub sid: String,
    pub lyr: Layer,
    pub evt: String,
    pub dat: Map<String, Value>,
}

/// Coerces arbitrary metadata into an object: `null` becomes empty, scalars
/// and arrays are kept under `value`.
pub fn into_metadata(data: Value) -> Map<String, Value> {
    match data {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert(String::from("value"), other);
            map
        }
    }
}
