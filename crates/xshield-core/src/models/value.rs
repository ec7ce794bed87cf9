//! Framework attribute values
//!
//! During planning an attribute is either null, not yet known, or a concrete
//! value. These markers must survive every transformation untouched.

/// A planned or stored attribute value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum AttrValue<T> {
    /// Explicitly absent
    #[default]
    Null,
    /// Will only be known after apply
    Unknown,
    /// A concrete value
    Known(T),
}

/// String attribute
pub type StringValue = AttrValue<String>;

/// 64-bit integer attribute
pub type Int64Value = AttrValue<i64>;

impl<T> AttrValue<T> {
    /// Whether the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Whether the value is unknown
    pub fn is_unknown(&self) -> bool {
        matches!(self, AttrValue::Unknown)
    }

    /// The concrete value, if known
    pub fn known(&self) -> Option<&T> {
        match self {
            AttrValue::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Consume into the concrete value, if known
    pub fn into_known(self) -> Option<T> {
        match self {
            AttrValue::Known(v) => Some(v),
            _ => None,
        }
    }
}

impl StringValue {
    /// A known string
    pub fn string(value: impl Into<String>) -> Self {
        AttrValue::Known(value.into())
    }

    /// The string, or `""` when null or unknown
    pub fn value_string(&self) -> &str {
        self.known().map(String::as_str).unwrap_or_default()
    }
}

impl Int64Value {
    /// The integer, or `0` when null or unknown
    pub fn value_int64(&self) -> i64 {
        self.known().copied().unwrap_or_default()
    }
}

impl<T> From<Option<T>> for AttrValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => AttrValue::Known(v),
            None => AttrValue::Null,
        }
    }
}
