//! Standardized mapping of hub HTTP failures to errors

use crate::error::PusherError;
use reqwest::StatusCode;

/// Standard error handler for hub HTTP responses
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Handle login-related HTTP errors
    pub fn handle_auth_error(status: StatusCode, error_text: &str) -> PusherError {
        let error_msg = match status.as_u16() {
            400 => format!("Invalid login request: {}", error_text),
            401 => "Invalid access token provided".to_string(),
            403 => "Access denied - token lacks permission".to_string(),
            404 => "Login endpoint not found - check the hub endpoint".to_string(),
            _ => format!("Login failed (status {}): {}", status, error_text),
        };

        PusherError::Auth(error_msg)
    }

    /// Handle upload-related HTTP errors
    pub fn handle_upload_error(status: StatusCode, error_text: &str, context: &str) -> PusherError {
        let error_msg = match status.as_u16() {
            400 => format!("Bad request during {}: {}", context, error_text),
            401 => format!("Authentication failed during {}: {}", context, error_text),
            403 => format!("Permission denied for {}: {}", context, error_text),
            404 => format!("Repository not found for {}: {}", context, error_text),
            408 | 504 => format!("{} timed out: {}", context, error_text),
            413 => format!("File too large for {}: {}", context, error_text),
            429 => format!("Rate limited during {}: {}", context, error_text),
            500 => format!("Hub server error during {}: {}", context, error_text),
            502 | 503 => format!("Hub unavailable during {}: {}", context, error_text),
            507 => format!("Hub out of storage during {}: {}", context, error_text),
            _ => format!("{} failed (status {}): {}", context, status, error_text),
        };

        PusherError::Upload(error_msg)
    }
}
