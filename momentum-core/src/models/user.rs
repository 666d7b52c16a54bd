use serde::{Deserialize, Serialize};

/// Cached profile of the signed-in user. Unknown fields are kept so the
/// cache round-trips whatever the backend sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
