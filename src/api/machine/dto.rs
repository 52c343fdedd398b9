use serde::Deserialize;
use validator::Validate;

/// Payload for creating or replacing a machine
#[derive(Debug, Deserialize, Validate)]
pub struct MachineInput {
    #[validate(length(min = 1, max = 255, message = "Machine name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100, message = "Machine type is required"))]
    pub kind: String,
    /// Substrates this machine can process; empty means anything
    #[serde(default)]
    pub compatibility: Vec<String>,
}
