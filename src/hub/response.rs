//! Response envelope shared by the hub's JSON endpoints

use serde::Deserialize;
use serde::de::DeserializeOwned;

/// `{"Code": .., "Success": .., "Message": .., "Data": ..}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiResponse<T> {
    pub code: Option<i64>,
    pub success: Option<bool>,
    pub message: Option<String>,
    pub request_id: Option<String>,
    pub data: Option<T>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}

impl<T> ApiResponse<T> {
    /// The hub reports failures inside 2xx responses through `Success`/`Code`.
    pub fn is_success(&self) -> bool {
        self.success != Some(false) && matches!(self.code, None | Some(200))
    }

    /// Human-readable reason for a failed envelope
    pub fn failure_message(&self) -> String {
        let message = self
            .message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or("no message returned");
        match (&self.code, &self.request_id) {
            (Some(code), Some(id)) => format!("{} (code {}, request {})", message, code, id),
            (Some(code), None) => format!("{} (code {})", message, code),
            _ => message.to_string(),
        }
    }
}

/// Payload of a successful login
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginData {
    pub access_token: String,
    pub username: Option<String>,
}
