use serde::{Deserialize, Serialize};

/// Payload for `POST /ai/suggest`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SuggestRequest {
    pub query: String,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    pub max_results: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Suggestion {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SuggestResponse {
    #[serde(default)]
    pub original_query: String,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}
