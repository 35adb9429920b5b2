//! # External Framework Mappings
//!
//! Every requirement carries exactly one mapping entry per known external
//! compliance framework, in the order of [`FrameworkId::all`]. The mapping
//! value is the raw cell of that framework's column and may be empty.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// External compliance frameworks a requirement is mapped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FrameworkId {
    /// Secure Analytics Trusted Research Environment framework.
    #[serde(rename = "SATRE")]
    Satre,
    /// ENTRUST blueprint for trusted research environments.
    #[serde(rename = "ENTRUST Blueprint")]
    EntrustBlueprint,
}

impl FrameworkId {
    /// All frameworks, in output order.
    pub fn all() -> &'static [FrameworkId] {
        &[FrameworkId::Satre, FrameworkId::EntrustBlueprint]
    }

    /// Identifier as written in `frameworkId`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameworkId::Satre => "SATRE",
            FrameworkId::EntrustBlueprint => "ENTRUST Blueprint",
        }
    }

    /// Default name of the requirement column holding this framework's mapping.
    pub fn default_column(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for FrameworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameworkId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FrameworkId::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown framework: {s:?}"))
    }
}

/// One entry of a requirement's `Framework Mappings` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameworkMapping {
    /// Framework being mapped to.
    #[serde(rename = "frameworkId")]
    pub framework_id: FrameworkId,
    /// Raw mapping cell (possibly empty).
    pub mapping: FieldValue,
}

impl FrameworkMapping {
    /// Convert to the JSON object stored on the requirement.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "frameworkId": self.framework_id.as_str(),
            "mapping": self.mapping.to_json(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn output_order_is_satre_then_entrust() {
        let ids: Vec<&str> = FrameworkId::all().iter().map(|f| f.as_str()).collect();
        assert_eq!(ids, ["SATRE", "ENTRUST Blueprint"]);
    }

    #[test]
    fn parse_roundtrip() {
        for f in FrameworkId::all() {
            assert_eq!(f.as_str().parse::<FrameworkId>().unwrap(), *f);
        }
        assert!("satre".parse::<FrameworkId>().is_err());
    }

    #[test]
    fn serde_format_matches_as_str() {
        for f in FrameworkId::all() {
            assert_eq!(
                serde_json::to_string(f).unwrap(),
                format!("\"{}\"", f.as_str())
            );
        }
    }

    #[test]
    fn mapping_json_shape() {
        let m = FrameworkMapping {
            framework_id: FrameworkId::EntrustBlueprint,
            mapping: FieldValue::Empty,
        };
        let expected = json!({"frameworkId": "ENTRUST Blueprint", "mapping": ""});
        assert_eq!(m.to_json(), expected);
        assert_eq!(serde_json::to_value(&m).unwrap(), expected);
    }
}
