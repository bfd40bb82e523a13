use crate::error::AppError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use chrono::NaiveDate;
use core_types::{parse_form_date, CoreError};
use std::collections::HashMap;
use std::str::FromStr;

/// The only file field the forms submit.
pub const IMAGE_FIELD: &str = "image";

/// An uploaded file, already reduced to a bare file name.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// A submitted form, read from either a urlencoded or a multipart body.
///
/// Text fields are collected by name; a non-empty `image` file part becomes
/// the upload. Browsers send an empty file part when no file was chosen, which
/// is treated as no upload.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    image: Option<Upload>,
}

impl FormData {
    /// The raw field value, or an empty string when absent.
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// A trimmed field that must not be blank.
    pub fn required(&self, name: &'static str) -> Result<String, CoreError> {
        let value = self.text(name).trim();
        if value.is_empty() {
            return Err(CoreError::MissingField(name));
        }
        Ok(value.to_string())
    }

    /// A field parsed into one of the closed enumerations.
    pub fn parse<T>(&self, name: &str) -> Result<T, CoreError>
    where
        T: FromStr<Err = CoreError>,
    {
        self.text(name).parse()
    }

    /// A `YYYY-MM-DD` date field.
    pub fn date(&self, name: &'static str) -> Result<NaiveDate, CoreError> {
        parse_form_date(name, self.text(name))
    }

    pub fn image(&self) -> Option<&Upload> {
        self.image.as_ref()
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| AppError::bad_request("body", e.body_text()))?;
            return Ok(FormData { fields, image: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request("body", e.body_text()))?;

        let mut form = FormData::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request("body", e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == IMAGE_FIELD {
                let raw_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(IMAGE_FIELD, e.body_text()))?;
                if raw_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                let file_name = clean_file_name(&raw_name).ok_or_else(|| {
                    AppError::bad_request(IMAGE_FIELD, format!("invalid file name: {raw_name:?}"))
                })?;
                form.image = Some(Upload { file_name, bytes });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request("body", e.body_text()))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }
}

/// Keeps only the last path component of a client-supplied file name (some
/// browsers send `C:\fakepath\pod.jpg`). Returns `None` if nothing usable is left.
pub fn clean_file_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::PlantHealth;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        FormData {
            fields: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            image: None,
        }
    }

    #[test]
    fn file_names_lose_their_directories() {
        assert_eq!(clean_file_name("pod.jpg").as_deref(), Some("pod.jpg"));
        assert_eq!(clean_file_name("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(clean_file_name("C:\\fakepath\\pod.jpg").as_deref(), Some("pod.jpg"));
        assert_eq!(clean_file_name("photos/.."), None);
        assert_eq!(clean_file_name(""), None);
    }

    #[test]
    fn required_fields_must_not_be_blank() {
        let data = form(&[("name", "  Habanero "), ("title", "   ")]);
        assert_eq!(data.required("name").unwrap(), "Habanero");
        assert_eq!(data.required("title").unwrap_err(), CoreError::MissingField("title"));
        assert_eq!(data.required("notes").unwrap_err().field(), "notes");
    }

    #[test]
    fn enum_fields_report_their_name() {
        let data = form(&[("health", "Thriving")]);
        let err = data.parse::<PlantHealth>("health").unwrap_err();
        assert_eq!(err.field(), "health");
    }
}
