use serde::{Deserialize, Serialize};

use crate::domain::ContactFields;

pub const SUBJECT_PREFIX: &str = "Portfolio Contact: Message from";

/// Body posted to the form-delivery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub access_key: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub subject: String,
}

impl SubmissionRequest {
    pub fn from_fields(access_key: impl Into<String>, fields: &ContactFields) -> Self {
        Self {
            access_key: access_key.into(),
            name: fields.name.clone(),
            email: fields.email.clone(),
            message: fields.message.clone(),
            subject: subject_for(&fields.name),
        }
    }
}

pub fn subject_for(sender_name: &str) -> String {
    format!("{SUBJECT_PREFIX} {sender_name}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmissionResponse {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Acknowledgement returned by a transport once the endpoint accepted a submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionAck {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_derived_subject() {
        let fields = ContactFields {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "hello".into(),
        };
        let value = serde_json::to_value(SubmissionRequest::from_fields("key-1", &fields))
            .expect("serialize");
        assert_eq!(value["access_key"], "key-1");
        assert_eq!(value["subject"], "Portfolio Contact: Message from Ada");
        assert_eq!(value["email"], "ada@example.com");
    }

    #[test]
    fn response_message_is_optional() {
        let parsed: SubmissionResponse =
            serde_json::from_str(r#"{"success":true}"#).expect("parse");
        assert_eq!(parsed, SubmissionResponse::accepted());

        let parsed: SubmissionResponse =
            serde_json::from_str(r#"{"success":false,"message":"quota"}"#).expect("parse");
        assert_eq!(parsed.message.as_deref(), Some("quota"));
    }
}
