use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::models::{Design, DesignPatch, DesignSummary, NewDesign};

// --- Requests ---

#[derive(Deserialize, Debug, Default)]
pub struct CreateDesignRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl From<CreateDesignRequest> for NewDesign {
    fn from(req: CreateDesignRequest) -> Self {
        NewDesign::new(req.name, req.data)
    }
}

/// Built from any JSON body. Only a string `name` and a non-null `data` are
/// taken; other fields, other types, and non-object bodies are ignored.
#[derive(Debug, Default, PartialEq)]
pub struct UpdateDesignRequest {
    pub name: Option<String>,
    pub data: Option<Value>,
}

impl From<Value> for UpdateDesignRequest {
    fn from(body: Value) -> Self {
        let Value::Object(mut fields) = body else {
            return UpdateDesignRequest::default();
        };
        let name = match fields.remove("name") {
            Some(Value::String(name)) => Some(name),
            _ => None,
        };
        let data = fields.remove("data").filter(|data| !data.is_null());
        UpdateDesignRequest { name, data }
    }
}

impl From<UpdateDesignRequest> for DesignPatch {
    fn from(req: UpdateDesignRequest) -> Self {
        DesignPatch {
            name: req.name,
            data: req.data,
        }
    }
}

// --- Responses ---

#[derive(Serialize, Debug, PartialEq)]
pub struct DesignResponse {
    pub id: i64,
    pub name: String,
    pub data: Value,
}

impl From<Design> for DesignResponse {
    fn from(design: Design) -> Self {
        DesignResponse {
            id: design.id,
            name: design.name,
            data: design.data,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct DesignListResponse {
    pub designs: Vec<DesignSummary>,
}

#[derive(Serialize, Debug)]
pub struct UpdateDesignResponse {
    pub status: &'static str,
    pub id: i64,
}

impl UpdateDesignResponse {
    pub fn success(id: i64) -> Self {
        UpdateDesignResponse {
            status: "success",
            id,
        }
    }
}
