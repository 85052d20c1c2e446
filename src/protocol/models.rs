use serde::{Deserialize, Serialize};

/// One entry in the model listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub created_at: String,
    pub display_name: String,
}

/// Model listing envelope. There is no pagination, so `has_more` is always false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub data: Vec<ModelInfo>,
    pub first_id: Option<String>,
    pub last_id: Option<String>,
    pub has_more: bool,
}

impl ModelsResponse {
    #[must_use]
    pub fn from_models(data: Vec<ModelInfo>) -> Self {
        let first_id = data.first().map(|model| model.id.clone());
        let last_id = data.last().map(|model| model.id.clone());
        Self {
            data,
            first_id,
            last_id,
            has_more: false,
        }
    }
}
