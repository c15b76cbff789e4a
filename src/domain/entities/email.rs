use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub id: Value,
    pub thread_id: Value,
    pub label_ids: Vec<String>,
    pub snippet: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub date: String,
    pub body: String,
    pub internal_date: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailThread {
    pub id: Value,
    pub history_id: Value,
    pub messages: Vec<EmailMessage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

impl OutgoingEmail {
    /// RFC 2822 text of the message, before transport encoding.
    pub fn to_mime(&self) -> String {
        [
            format!("To: {}", self.to),
            format!("Subject: {}", self.subject),
            "Content-Type: text/plain; charset=utf-8".to_string(),
            "MIME-Version: 1.0".to_string(),
            String::new(),
            self.body.clone(),
        ]
        .join("\r\n")
    }
}
