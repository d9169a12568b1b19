//! Opaque collection of coupon eligibility conditions.
//!
//! Conditions are stored and carried as JSON only; nothing here evaluates
//! them against a cart.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Ordered list of serialized eligibility conditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponRuleCollection(Vec<JsonValue>);

impl CouponRuleCollection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_conditions(conditions: Vec<JsonValue>) -> Self {
        Self(conditions)
    }

    pub fn conditions(&self) -> &[JsonValue] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Serializes the collection for storage.
    pub fn to_storage(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// Reads a collection back from storage. A blank value is an empty collection.
    pub fn from_storage(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::empty());
        }
        serde_json::from_str(raw).map(Self)
    }
}
