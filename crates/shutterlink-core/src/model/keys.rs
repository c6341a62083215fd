use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque controller-assigned camera identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraKey(String);

impl CameraKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque controller-assigned photo identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoKey(String);

impl PhotoKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! key_conversions {
    ($($key:ty),+) => {$(
        impl fmt::Display for $key {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $key {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::new(s))
            }
        }

        impl From<&str> for $key {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl From<String> for $key {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    )+};
}

key_conversions!(CameraKey, PhotoKey);
