use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ContactRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing required fields"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Missing required fields"))]
    pub email: String,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Missing required fields"))]
    pub message: String,
}

impl ContactRequest {
    /// Trims surrounding whitespace so blank fields fail validation.
    pub fn normalized(self) -> Self {
        ContactRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            message: self.message.trim().to_string(),
        }
    }

    pub fn subject_line(&self) -> String {
        format!("Portfolio Enquiry: {}", self.subject.as_deref().unwrap_or("No Subject"))
    }
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
}

impl ContactResponse {
    pub fn sent() -> Self {
        ContactResponse { message: "Email sent successfully".into() }
    }
}
