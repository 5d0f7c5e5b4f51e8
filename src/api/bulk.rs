use std::sync::Arc;

use poem::session::Session;
use poem::web::{Data, Html, Multipart};
use poem::{Response, handler};

use crate::api::helpers::{flash_redirect, take_flashes};
use crate::api::upload::read_file_field;
use crate::app_data::AppData;
use crate::errors::internal::ImportError;
use crate::errors::{InternalError, WebError};
use crate::types::internal::{CurrentUser, FlashCategory};
use crate::views;
use crate::views::format::to_persian_digits;

#[handler]
pub async fn upload_page(session: &Session, Data(user): Data<&CurrentUser>) -> Html<String> {
    Html(views::bulk::upload(user, &take_flashes(session)))
}

#[handler]
pub async fn process_upload(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Data(user): Data<&CurrentUser>,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let Some(upload) = read_file_field(&mut multipart, "file").await? else {
        return Ok(flash_redirect(session, FlashCategory::Warning, "هیچ فایلی انتخاب نشده است.", "/bulk_upload"));
    };

    tracing::info!("{} uploaded {} for bulk import", user.username, upload.file_name);

    let conn = app.database.open().await?;
    match app.bulk_importer.import(&conn, upload.bytes, &user.display_name).await {
        Ok(imported) => {
            let message = format!("{} گزارش با موفقیت وارد شد.", to_persian_digits(&imported.to_string()));
            Ok(flash_redirect(session, FlashCategory::Success, message, "/"))
        }
        Err(InternalError::Import(e)) => {
            tracing::warn!("Bulk import aborted: {}", e);
            Ok(flash_redirect(session, FlashCategory::Danger, import_failure_message(&e), "/bulk_upload"))
        }
        Err(e) => Err(e.into()),
    }
}

fn import_failure_message(error: &ImportError) -> String {
    let detail = match error {
        ImportError::Unreadable(_) | ImportError::NoWorksheet => "فایل قابل خواندن نیست.".to_string(),
        ImportError::Empty => "فایل خالی است.".to_string(),
        ImportError::MissingColumn(column) => format!("ستون «{column}» در فایل وجود ندارد."),
        ImportError::Row { row, cause } => {
            format!("خطا در ردیف {}: {cause}", to_persian_digits(&row.to_string()))
        }
    };
    format!("{detail} هیچ گزارشی وارد نشد.")
}
