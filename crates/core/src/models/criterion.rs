//! Entrance-test grading criteria

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntranceCriterion {
    pub id: i64,
    pub name: String,
    /// Share of the final score, in percent
    pub weight: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub for_entrance_test: bool,
}
