pub mod http;

use std::path::Path;

use async_trait::async_trait;
use indexmap::IndexMap;

pub use self::http::HttpCollaborator;
use crate::core::{
    ImportError,
    TransportError,
};

/// A file picked for import, read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), bytes }
    }

    /// Reads `path` into memory. Runs on the task runtime, never on the UI thread.
    pub async fn read(path: &Path) -> Result<Self, ImportError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { file_name: file_name_of(path), bytes })
    }
}

/// Final path component, as sent to the parse service.
pub fn file_name_of(path: &Path) -> String {
    path.file_name().and_then(|name| name.to_str()).unwrap_or("upload").to_string()
}

/// Lower-cased extension of a file name, if it has one.
pub fn extension_of(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Status and body of a collaborator reply, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First present string field among `keys` in a JSON object body.
    pub fn message_field(&self, keys: &[&str]) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        let object = value.as_object()?;
        keys.iter().find_map(|key| match object.get(*key) {
            Some(serde_json::Value::String(s)) if s.trim().is_empty() => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
    }
}

/// Converts an uploaded spreadsheet into records.
#[async_trait]
pub trait ParseService: Send + Sync {
    async fn upload(&self, file: &FileUpload) -> Result<RawResponse, TransportError>;
}

/// Persists one submitted form payload.
#[async_trait]
pub trait SaveService: Send + Sync {
    async fn save(&self, payload: &IndexMap<String, String>) -> Result<RawResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(extension_of("cards.XLSX").as_deref(), Some("xlsx"));
        assert_eq!(extension_of("cards"), None);
        assert_eq!(extension_of("cards."), None);
        assert_eq!(file_name_of(Path::new("/tmp/in/cards.csv")), "cards.csv");
    }

    #[test]
    fn test_message_field_order() {
        let resp = RawResponse::new(500, r#"{"message":"m","detail":"DB down"}"#);
        assert_eq!(resp.message_field(&["detail", "message"]).as_deref(), Some("DB down"));
        assert_eq!(resp.message_field(&["error"]), None);
        assert_eq!(RawResponse::new(502, "<html>").message_field(&["detail"]), None);
    }

    #[test]
    fn test_blank_message_falls_through_to_next_key() {
        let resp = RawResponse::new(500, r#"{"detail":"","error":"real reason"}"#);
        assert_eq!(
            resp.message_field(&["detail", "error", "message"]).as_deref(),
            Some("real reason")
        );
        assert_eq!(RawResponse::new(500, r#"{"detail":"  "}"#).message_field(&["detail"]), None);
    }

    #[tokio::test]
    async fn test_read_uses_final_path_component() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.xlsx");
        std::fs::write(&path, b"bytes").unwrap();

        let upload = FileUpload::read(&path).await.unwrap();
        assert_eq!(upload, FileUpload::new("cards.xlsx", b"bytes".to_vec()));

        let missing = FileUpload::read(&dir.path().join("gone.csv")).await;
        assert!(matches!(missing, Err(ImportError::Io(_))));
    }

    #[test]
    fn test_success_range() {
        assert!(RawResponse::new(201, "").is_success());
        assert!(!RawResponse::new(302, "").is_success());
        assert!(!RawResponse::new(500, "").is_success());
    }
}
