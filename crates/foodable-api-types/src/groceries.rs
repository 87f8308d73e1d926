use serde::{Deserialize, Serialize};

use crate::Id;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Grocery {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
}

/// Payload for `POST /groceries/`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct NewGrocery {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
}

impl Grocery {
    /// Field-wise comparison that ignores the server-assigned id.
    pub fn matches(&self, new: &NewGrocery) -> bool {
        self.name == new.name
            && self.category == new.category
            && self.calories == new.calories
            && self.protein == new.protein
    }
}
