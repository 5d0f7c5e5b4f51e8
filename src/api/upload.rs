use poem::web::Multipart;

use crate::errors::WebError;

/// One uploaded file pulled out of a multipart body
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Find the file sent under `field_name`; other fields are skipped
///
/// `Ok(None)` when the field is missing or was submitted without a file.
pub async fn read_file_field(multipart: &mut Multipart, field_name: &str) -> Result<Option<UploadedFile>, WebError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::bad_request(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| WebError::bad_request(format!("Malformed upload: {e}")))?;

        if file_name.is_empty() && bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(UploadedFile { file_name, bytes }));
    }

    Ok(None)
}
