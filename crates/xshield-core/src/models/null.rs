//! Nullable JSON scalars
//!
//! Distinguish "present" from "null/absent" for primitive fields. Decoding the
//! literal `null` never fails; a non-null payload of the wrong type does.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A string with a validity flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullString {
    /// The value (empty when not valid)
    pub string: String,
    /// Whether the value was present
    pub valid: bool,
}

impl NullString {
    /// A present value
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            string: value.into(),
            valid: true,
        }
    }

    /// A null value
    pub fn null() -> Self {
        Self::default()
    }

    /// The value, if valid
    pub fn as_option(&self) -> Option<&str> {
        self.valid.then_some(self.string.as_str())
    }
}

impl<'de> Deserialize<'de> for NullString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(string) => Self {
                string,
                valid: true,
            },
            None => Self::null(),
        })
    }
}

impl Serialize for NullString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

/// A 64-bit integer with a validity flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullInt {
    /// The value (zero when not valid)
    pub int64: i64,
    /// Whether the value was present
    pub valid: bool,
}

impl NullInt {
    /// A present value
    pub fn new(value: i64) -> Self {
        Self {
            int64: value,
            valid: true,
        }
    }

    /// A null value
    pub fn null() -> Self {
        Self::default()
    }

    /// The value, if valid
    pub fn as_option(&self) -> Option<i64> {
        self.valid.then_some(self.int64)
    }
}

impl<'de> Deserialize<'de> for NullInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<i64>::deserialize(deserializer)? {
            Some(int64) => Self::new(int64),
            None => Self::null(),
        })
    }
}

impl Serialize for NullInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}
