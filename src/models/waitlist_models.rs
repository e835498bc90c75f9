use serde::Serialize;
use serde_json::{Map, Value};

use crate::repositories::record_store::Document;

/// One record in the "waitlist" collection.
#[derive(Debug, Clone)]
pub struct WaitlistEntry {
    pub id: String,
    pub full_name: String,
    pub email: String, // stored lowercased/trimmed
    pub phone: String, // stored trimmed, compared verbatim
    pub user_id: Option<String>, // identity-provider subject id
    pub user_email: Option<String>,
    pub sign_in_method: Option<String>, // "google" when captured through the provider shortcut
    pub created_at: Option<i64>, // store-assigned create time, epoch millis
}

pub struct NewWaitlistEntry {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub sign_in_method: Option<String>,
}

impl WaitlistEntry {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            full_name: doc.str_field("fullName").unwrap_or_default().to_string(),
            email: doc.str_field("email").unwrap_or_default().to_string(),
            phone: doc.str_field("phone").unwrap_or_default().to_string(),
            user_id: doc.str_field("userId").map(str::to_string),
            user_email: doc.str_field("userEmail").map(str::to_string),
            sign_in_method: doc.str_field("signInMethod").map(str::to_string),
            created_at: doc.create_time,
        }
    }
}

impl NewWaitlistEntry {
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("fullName".to_string(), Value::String(self.full_name));
        fields.insert("email".to_string(), Value::String(self.email));
        fields.insert("phone".to_string(), Value::String(self.phone));
        fields.insert(
            "userId".to_string(),
            self.user_id.map(Value::String).unwrap_or(Value::Null),
        );
        fields.insert(
            "userEmail".to_string(),
            self.user_email.map(Value::String).unwrap_or(Value::Null),
        );
        if let Some(method) = self.sign_in_method {
            fields.insert("signInMethod".to_string(), Value::String(method));
        }
        fields
    }
}

/// One record in the "pitches" collection. Created once, listed, never
/// updated or deleted by this system.
#[derive(Debug, Clone, Serialize)]
pub struct PitchSubmission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String, // fixed discriminator, always "url"
    pub url: String,
    pub status: String, // starts out "pending", managed elsewhere
    #[serde(rename = "createdAt")]
    pub created_at: Option<i64>,
}

pub struct NewPitchSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub description: String,
    pub url: String,
}

impl PitchSubmission {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.str_field("name").unwrap_or_default().to_string(),
            email: doc.str_field("email").unwrap_or_default().to_string(),
            phone: doc.str_field("phone").unwrap_or_default().to_string(),
            title: doc.str_field("title").unwrap_or_default().to_string(),
            description: doc.str_field("description").unwrap_or_default().to_string(),
            kind: doc.str_field("type").unwrap_or("url").to_string(),
            url: doc.str_field("url").unwrap_or_default().to_string(),
            status: doc.str_field("status").unwrap_or("pending").to_string(),
            created_at: doc.create_time,
        }
    }
}

impl NewPitchSubmission {
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(self.name));
        fields.insert("email".to_string(), Value::String(self.email));
        fields.insert("phone".to_string(), Value::String(self.phone));
        fields.insert("title".to_string(), Value::String(self.title));
        fields.insert("description".to_string(), Value::String(self.description));
        fields.insert("type".to_string(), Value::String("url".to_string()));
        fields.insert("url".to_string(), Value::String(self.url));
        fields.insert("status".to_string(), Value::String("pending".to_string()));
        fields
    }
}
