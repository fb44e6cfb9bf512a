//! Multipart form parsing shared by all tool endpoints

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;

use crate::error::ApiError;

/// Name of the multipart part carrying the document
const FILE_FIELD: &str = "file";

/// An uploaded file
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    /// Extension of the uploaded file name, restricted to short ASCII
    /// alphanumerics so it is safe to put on a command line
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name.as_deref()?;
        let (_, ext) = name.rsplit_once('.')?;
        is_safe_extension(ext).then(|| ext.to_ascii_lowercase())
    }
}

/// 1-10 ASCII alphanumerics
pub fn is_safe_extension(ext: &str) -> bool {
    (1..=10).contains(&ext.len()) && ext.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// The `file` part plus every text field of a tool request
#[derive(Debug, Default)]
pub struct ToolForm {
    file: Option<Upload>,
    fields: HashMap<String, String>,
}

impl ToolForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = ToolForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::MissingInput(format!("Failed to read multipart field: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == FILE_FIELD {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::MissingInput(format!("Failed to read file data: {}", e))
                })?;
                form.file = Some(Upload { file_name, bytes });
            } else {
                let value = field.text().await.map_err(|e| {
                    ApiError::MissingInput(format!("Failed to read field '{}': {}", name, e))
                })?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Take the uploaded file, rejecting a missing or empty one
    pub fn require_file(&mut self) -> Result<Upload, ApiError> {
        self.file
            .take()
            .filter(|upload| !upload.bytes.is_empty())
            .ok_or_else(|| ApiError::MissingInput("No file provided".into()))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// A text field that must be present and non-empty. The value is
    /// returned as sent; a password may legitimately be all spaces.
    pub fn require_text(&self, name: &str) -> Result<&str, ApiError> {
        self.text(name)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::MissingInput(format!("Missing required field '{}'", name)))
    }

    #[cfg(test)]
    pub fn with_file(mut self, file_name: Option<&str>, bytes: &'static [u8]) -> Self {
        self.file = Some(Upload {
            file_name: file_name.map(str::to_string),
            bytes: Bytes::from_static(bytes),
        });
        self
    }

    #[cfg(test)]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }
}
