use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The `deleted` field as servers actually send it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeletedFlag {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Default for DeletedFlag {
    fn default() -> Self {
        DeletedFlag::Bool(false)
    }
}

impl DeletedFlag {
    /// 0 and 1 (int or float) and booleans are accepted, anything else is an error.
    pub fn to_bool(self) -> Result<bool> {
        match self {
            DeletedFlag::Bool(b) => Ok(b),
            DeletedFlag::Int(0) => Ok(false),
            DeletedFlag::Int(1) => Ok(true),
            DeletedFlag::Float(f) if f == 0.0 => Ok(false),
            DeletedFlag::Float(f) if f == 1.0 => Ok(true),
            DeletedFlag::Int(i) => Err(Error::decode(format!("invalid deleted value {}", i))),
            DeletedFlag::Float(f) => Err(Error::decode(format!("invalid deleted value {}", f))),
        }
    }
}

/// Resolve an optional flag, absent meaning not deleted.
pub(crate) fn resolve(flag: Option<DeletedFlag>) -> Result<bool> {
    flag.unwrap_or_default().to_bool()
}
