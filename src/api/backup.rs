use std::sync::Arc;

use poem::http::header;
use poem::session::Session;
use poem::web::{Data, Multipart};
use poem::{IntoResponse, Response, handler};

use crate::api::helpers::flash_redirect;
use crate::api::upload::read_file_field;
use crate::app_data::AppData;
use crate::errors::internal::BackupError;
use crate::errors::{InternalError, WebError};
use crate::services::BackupService;
use crate::types::internal::{CurrentUser, FlashCategory};

/// Stream the database file as an attachment
#[handler]
pub async fn download(Data(app): Data<&Arc<AppData>>, Data(user): Data<&CurrentUser>) -> Result<Response, WebError> {
    let bytes = app.backup_service.backup().await?;
    let file_name = BackupService::backup_file_name();

    tracing::info!("{} downloaded backup {}", user.username, file_name);

    Ok(bytes
        .with_content_type("application/octet-stream")
        .with_header(header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\""))
        .into_response())
}

#[handler]
pub async fn restore(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Data(user): Data<&CurrentUser>,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let Some(upload) = read_file_field(&mut multipart, "backup_file").await? else {
        return Ok(flash_redirect(session, FlashCategory::Warning, "هیچ فایلی انتخاب نشده است.", "/users"));
    };

    match app.backup_service.restore(&upload.file_name, &upload.bytes).await {
        Ok(()) => {
            tracing::warn!("{} restored the database from {}", user.username, upload.file_name);
            Ok(flash_redirect(session, FlashCategory::Success, "پایگاه داده با موفقیت بازیابی شد.", "/users"))
        }
        Err(InternalError::Backup(BackupError::InvalidFileType(_))) => Ok(flash_redirect(
            session,
            FlashCategory::Danger,
            "فایل پشتیبان باید پسوند .db داشته باشد.",
            "/users",
        )),
        Err(InternalError::Backup(BackupError::NotADatabase(_))) => Ok(flash_redirect(
            session,
            FlashCategory::Danger,
            "فایل انتخاب‌شده یک پایگاه داده معتبر نیست.",
            "/users",
        )),
        Err(e) => Err(e.into()),
    }
}
