// SPDX-License-Identifier: MIT

use serde::{Deserialize, Deserializer};

/// Image size in bytes, written as `"5M"`, `"512K"`, `"1G"` or a plain byte count.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Size(pub u64);

impl Size {
    pub fn bytes(&self) -> u64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Size {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SizeVisitor;

        impl<'de> serde::de::Visitor<'de> for SizeVisitor {
            type Value = Size;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a size string like '5M', '512K', '1G' or a byte count")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                parse_size(value).map(Size).map_err(|_| {
                    E::custom(format!("Invalid size format '{value}'. Use K, M or G suffix."))
                })
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Size(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u64::try_from(value)
                    .map(Size)
                    .map_err(|_| E::custom("size must not be negative"))
            }
        }

        deserializer.deserialize_any(SizeVisitor)
    }
}

impl std::str::FromStr for Size {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_size(s).map(Size)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::utils::pretty_bytes(self.0))
    }
}

pub fn parse_size(size: &str) -> anyhow::Result<u64> {
    let lower = size.trim().to_lowercase();

    let (num, mul) = if let Some(num) = lower.strip_suffix('k') {
        (num, 1024)
    } else if let Some(num) = lower.strip_suffix('m') {
        (num, 1024 * 1024)
    } else if let Some(num) = lower.strip_suffix('g') {
        (num, 1024 * 1024 * 1024)
    } else {
        (lower.as_str(), 1)
    };

    let value = num
        .trim()
        .parse::<u64>()
        .map_err(|_| anyhow::anyhow!("Unknown size format '{}'", size))?;
    value
        .checked_mul(mul)
        .ok_or_else(|| anyhow::anyhow!("Size '{}' overflows", size))
}
