use std::collections::HashMap;

use axum::extract::Multipart;

use crate::errors::AppError;
use crate::storage::ResumeUpload;

/// Field carrying the resume file in multipart forms.
pub const FILE_FIELD: &str = "file";

/// A multipart form with an optional resume file and its text fields.
pub struct ResumeForm {
    pub file: Option<ResumeUpload>,
    pub fields: HashMap<String, String>,
}

impl ResumeForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

pub async fn read_resume_form(mut multipart: Multipart) -> Result<ResumeForm, AppError> {
    let mut form = ResumeForm {
        file: None,
        fields: HashMap::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };

        if name == FILE_FIELD {
            let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;
            form.file = Some(ResumeUpload {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid field '{name}': {e}")))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
