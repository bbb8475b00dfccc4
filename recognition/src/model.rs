use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::RecordError;

/// Identifies a known object and one of its pose templates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelId {
    pub name: String,
    pub variant: i32,
}

impl ModelId {
    pub fn new(name: impl Into<String>, variant: i32) -> Self {
        Self {
            name: name.into(),
            variant,
        }
    }

    /// `name_variant`, used to name resources belonging to this model.
    pub fn object_name(&self) -> String {
        format!("{}_{}", self.name, self.variant)
    }
}

/// Record form `name,variant`.
impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.name, self.variant)
    }
}

impl FromStr for ModelId {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RecordError::InvalidModelId(s.to_string());

        let (name, variant) = s.trim().rsplit_once(',').ok_or_else(invalid)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid());
        }
        let variant = variant.trim().parse().map_err(|_| invalid())?;

        Ok(Self::new(name, variant))
    }
}
