use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde_json::{json, Map, Value};

use crate::error::StoreError;

use super::record_store::{Document, RecordStore};

const PAGE_SIZE: u32 = 300;

/// Record store client speaking the Firestore REST v1 API. Constructed once
/// at process start and injected into the repositories.
pub struct FirestoreStore {
    http: Client,
    base_url: String,
    project_id: String,
    api_key: Option<String>,
}

impl FirestoreStore {
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("FIRESTORE_PROJECT_ID").expect("FIRESTORE_PROJECT_ID must be set"),
            std::env::var("FIRESTORE_API_KEY").ok(),
            std::env::var("FIRESTORE_BASE_URL")
                .unwrap_or_else(|_| "https://firestore.googleapis.com/v1".to_string()),
        )
    }

    pub fn new(project_id: String, api_key: Option<String>, base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            project_id,
            api_key,
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, collection
        )
    }

    fn query_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents:runQuery",
            self.base_url, self.project_id
        )
    }

    fn apply_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<Value, StoreError> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(StoreError::Transport);
        }
        match status.as_u16() {
            403 => Err(StoreError::PermissionDenied),
            503 => Err(StoreError::Unavailable),
            409 => Err(StoreError::AlreadyExists),
            code => {
                let body: Value = response.json().await.unwrap_or(Value::Null);
                let message = body["error"]["message"]
                    .as_str()
                    .unwrap_or("unknown error")
                    .to_string();
                Err(StoreError::Api {
                    status: code,
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl RecordStore for FirestoreStore {
    async fn insert_one(
        &self,
        collection: &str,
        document_id: Option<String>,
        fields: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let mut request = self
            .http
            .post(self.collection_url(collection))
            .json(&json!({ "fields": encode_fields(&fields) }));
        if let Some(id) = &document_id {
            // createDocument with a caller-chosen id fails ALREADY_EXISTS when
            // the id is taken, which closes the check-then-act race.
            request = request.query(&[("documentId", id.as_str())]);
        }
        let body = Self::check(self.apply_key(request).send().await?).await?;
        decode_document(&body)
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": { "stringValue": value }
                    }
                }
            }
        });
        let request = self.http.post(self.query_url()).json(&query);
        let body = Self::check(self.apply_key(request).send().await?).await?;
        let rows = body
            .as_array()
            .ok_or_else(|| StoreError::Decode("runQuery did not return an array".to_string()))?;
        let mut documents = Vec::new();
        for row in rows {
            // rows without a "document" key carry only a read time
            if row.get("document").is_some() {
                documents.push(decode_document(&row["document"])?);
            }
        }
        Ok(documents)
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .http
                .get(self.collection_url(collection))
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }
            let body = Self::check(self.apply_key(request).send().await?).await?;
            if let Some(rows) = body["documents"].as_array() {
                for row in rows {
                    documents.push(decode_document(row)?);
                }
            }
            match body["nextPageToken"].as_str() {
                Some(token) => page_token = Some(token.to_string()),
                None => return Ok(documents),
            }
        }
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.collection_url(collection), id);
        let request = self.http.delete(url);
        Self::check(self.apply_key(request).send().await?).await?;
        Ok(())
    }
}

/// Plain JSON -> Firestore value JSON.
fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) if n.is_i64() => json!({ "integerValue": n.to_string() }),
        Value::Number(n) => json!({ "doubleValue": n.as_f64() }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

fn encode_fields(fields: &Map<String, Value>) -> Value {
    let mut encoded = Map::new();
    for (name, value) in fields {
        encoded.insert(name.clone(), encode_value(value));
    }
    Value::Object(encoded)
}

/// Firestore value JSON -> plain JSON. Timestamps stay RFC 3339 strings;
/// the store-assigned document create time is surfaced separately.
fn decode_value(value: &Value) -> Value {
    let Some(map) = value.as_object() else {
        return Value::Null;
    };
    if let Some(s) = map.get("stringValue").and_then(|v| v.as_str()) {
        return Value::String(s.to_string());
    }
    if let Some(raw) = map.get("integerValue") {
        let parsed = match raw {
            Value::String(s) => s.parse::<i64>().ok(),
            other => other.as_i64(),
        };
        if let Some(n) = parsed {
            return Value::Number(n.into());
        }
    }
    if let Some(f) = map.get("doubleValue").and_then(|v| v.as_f64()) {
        return serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null);
    }
    if let Some(b) = map.get("booleanValue").and_then(|v| v.as_bool()) {
        return Value::Bool(b);
    }
    if let Some(ts) = map.get("timestampValue").and_then(|v| v.as_str()) {
        return Value::String(ts.to_string());
    }
    if let Some(values) = map
        .get("arrayValue")
        .and_then(|v| v.get("values"))
        .and_then(|v| v.as_array())
    {
        return Value::Array(values.iter().map(decode_value).collect());
    }
    if let Some(fields) = map
        .get("mapValue")
        .and_then(|v| v.get("fields"))
        .and_then(|v| v.as_object())
    {
        let mut decoded = Map::new();
        for (name, nested) in fields {
            decoded.insert(name.clone(), decode_value(nested));
        }
        return Value::Object(decoded);
    }
    Value::Null
}

fn decode_document(value: &Value) -> Result<Document, StoreError> {
    let name = value["name"]
        .as_str()
        .ok_or_else(|| StoreError::Decode("document has no name".to_string()))?;
    let id = name
        .rsplit('/')
        .next()
        .unwrap_or(name)
        .to_string();
    let mut fields = Map::new();
    if let Some(raw_fields) = value["fields"].as_object() {
        for (field_name, raw) in raw_fields {
            fields.insert(field_name.clone(), decode_value(raw));
        }
    }
    let create_time = value["createTime"]
        .as_str()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.timestamp_millis());
    Ok(Document {
        id,
        fields,
        create_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_plain_fields_to_firestore_values() {
        let mut fields = Map::new();
        fields.insert("email".to_string(), Value::String("a@b.c".to_string()));
        fields.insert("userId".to_string(), Value::Null);
        fields.insert("count".to_string(), json!(3));
        let encoded = encode_fields(&fields);
        assert_eq!(encoded["email"], json!({ "stringValue": "a@b.c" }));
        assert_eq!(encoded["userId"], json!({ "nullValue": null }));
        assert_eq!(encoded["count"], json!({ "integerValue": "3" }));
    }

    #[test]
    fn decodes_document_name_fields_and_create_time() {
        let raw = json!({
            "name": "projects/p/databases/(default)/documents/waitlist/abc123",
            "fields": {
                "email": { "stringValue": "a@b.c" },
                "verified": { "booleanValue": false },
                "tags": { "arrayValue": { "values": [{ "stringValue": "x" }] } }
            },
            "createTime": "1970-01-01T00:00:01Z"
        });
        let doc = decode_document(&raw).unwrap();
        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.str_field("email"), Some("a@b.c"));
        assert_eq!(doc.fields["verified"], Value::Bool(false));
        assert_eq!(doc.fields["tags"], json!(["x"]));
        assert_eq!(doc.create_time, Some(1_000));
    }

    #[test]
    fn decode_rejects_nameless_document() {
        assert!(decode_document(&json!({ "fields": {} })).is_err());
    }
}
