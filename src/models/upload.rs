//! JSON bodies returned by `POST /api/upload`.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum UploadResponse {
    Success { success: bool, url: String },
    Failure { success: bool, error: String },
}

impl UploadResponse {
    pub fn success(url: impl Into<String>) -> Self {
        UploadResponse::Success {
            success: true,
            url: url.into(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        UploadResponse::Failure {
            success: false,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_shape() {
        let body = serde_json::to_value(UploadResponse::success("http://x/plum-koala")).unwrap();
        assert_eq!(body, json!({"success": true, "url": "http://x/plum-koala"}));
    }

    #[test]
    fn failure_shape() {
        let body = serde_json::to_value(UploadResponse::failure("Failed to process upload")).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "error": "Failed to process upload"})
        );
    }
}
