use serde::{Deserialize, Serialize};

/// Storefront homepage copy edited from the website editor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HomepageContent {
    pub heading: String,
    pub tagline: String,
    #[serde(default)]
    pub updated_ts: Option<i64>, // ms since epoch, None until first edit
}

impl Default for HomepageContent {
    fn default() -> Self {
        Self {
            heading: "Victory Bazaar - Premium Shopping Experience".to_string(),
            tagline: "Your one-stop destination for all shopping needs".to_string(),
            updated_ts: None,
        }
    }
}
