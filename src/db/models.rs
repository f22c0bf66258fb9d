use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Name given to designs created without one.
pub const UNTITLED: &str = "Untitled";

/// A named document holding arbitrary canvas data.
/// Corresponds to the `designs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    pub id: i64,
    pub name: String,
    pub data: Value,
    pub updated_at: String,
}

/// List-view projection of a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSummary {
    pub id: i64,
    pub name: String,
    pub updated_at: String,
}

/// A design about to be stored, defaults already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDesign {
    pub name: String,
    pub data: Value,
}

/// Fields to overwrite on an existing design. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignPatch {
    pub name: Option<String>,
    pub data: Option<Value>,
}

impl Design {
    /// Stand-in returned for ids the store does not hold.
    pub fn placeholder(id: i64) -> Self {
        Design {
            id,
            name: format!("Design {id}"),
            data: json!({ "elements": [] }),
            updated_at: String::new(),
        }
    }

    pub fn summary(&self) -> DesignSummary {
        DesignSummary {
            id: self.id,
            name: self.name.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    pub fn apply(&mut self, patch: DesignPatch, updated_at: String) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(data) = patch.data {
            self.data = data;
        }
        self.updated_at = updated_at;
    }
}

impl NewDesign {
    pub fn new(name: Option<String>, data: Option<Value>) -> Self {
        NewDesign {
            name: name.unwrap_or_else(|| UNTITLED.to_string()),
            data: data.unwrap_or_else(|| json!({})),
        }
    }

    pub fn into_design(self, id: i64, updated_at: String) -> Design {
        Design {
            id,
            name: self.name,
            data: self.data,
            updated_at,
        }
    }
}

/// The two designs every fresh in-memory store starts with.
pub fn sample_designs() -> Vec<Design> {
    vec![
        Design {
            id: 1,
            name: "Design 1".to_string(),
            data: json!({ "elements": [] }),
            updated_at: "2023-01-01".to_string(),
        },
        Design {
            id: 2,
            name: "Design 2".to_string(),
            data: json!({ "elements": [] }),
            updated_at: "2023-01-02".to_string(),
        },
    ]
}

/// Current UTC time as an RFC 3339 string with second precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
