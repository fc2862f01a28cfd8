//! Persisted record shapes

use crate::act::Polarity;
use crate::locus::LocusPath;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocusRecord {
    pub id: String,
    pub dialogue_id: String,
    pub path: LocusPath,
}

/// Where a delocated design was cloned from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub shifted_from: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignMeta {
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

impl Default for DesignMeta {
    fn default() -> Self {
        Self {
            created_at: Utc::now(),
            provenance: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub id: String,
    pub dialogue_id: String,
    pub participant_id: String,
    pub root_locus_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default)]
    pub meta: DesignMeta,
}

impl Design {
    /// Delocation tag this design was cloned under, if any
    pub fn shift_tag(&self) -> Option<&str> {
        self.meta.provenance.as_ref().map(|p| p.tag.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActKind {
    Proper,
    Daimon,
}

impl std::str::FromStr for ActKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PROPER" => Ok(ActKind::Proper),
            "DAIMON" => Ok(ActKind::Daimon),
            other => Err(format!("unknown act kind: {other}")),
        }
    }
}

/// Traceability for an act imported by fax
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaxOrigin {
    pub from_design_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_locus: Option<LocusPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<FaxOrigin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActRecord {
    pub id: String,
    pub design_id: String,
    pub kind: ActKind,
    pub polarity: Polarity,
    #[serde(default)]
    pub expression: String,
    /// Daimons emitted by the move compiler may carry no locus
    #[serde(default)]
    pub locus_id: Option<String>,
    #[serde(default)]
    pub ramification: Vec<String>,
    pub order_in_design: u32,
    #[serde(default, rename = "metaJson")]
    pub meta: ActMeta,
}
