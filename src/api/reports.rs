use std::sync::Arc;

use poem::session::Session;
use poem::web::{Data, Form, Html, Path, Query};
use poem::{IntoResponse, Response, handler};

use crate::api::helpers::{flash_redirect, redirect, take_flashes};
use crate::app_data::AppData;
use crate::errors::internal::ReportError;
use crate::errors::{InternalError, WebError};
use crate::types::dto::{ReportFilterQuery, ReportForm};
use crate::types::internal::{CurrentUser, FlashCategory, SubmitOutcome};
use crate::views;
use crate::views::format::to_persian_digits;

#[handler]
pub async fn index(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Data(user): Data<&CurrentUser>,
    Query(query): Query<ReportFilterQuery>,
) -> Result<Html<String>, WebError> {
    let filter = query.into_filter();
    let reports = {
        let conn = app.database.open().await?;
        app.report_store.list_reports(&conn, &filter).await?
    };

    Ok(Html(views::reports::index(user, &take_flashes(session), &reports, &filter)))
}

#[handler]
pub async fn add_page(session: &Session, Data(user): Data<&CurrentUser>) -> Html<String> {
    Html(views::reports::form(user, &take_flashes(session), None))
}

#[handler]
pub async fn edit_page(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Data(user): Data<&CurrentUser>,
    Path(report_id): Path<i32>,
) -> Result<Response, WebError> {
    let report = {
        let conn = app.database.open().await?;
        app.report_store.find_report(&conn, report_id).await?
    };

    match report {
        Some(report) => Ok(Html(views::reports::form(user, &take_flashes(session), Some(&report))).into_response()),
        None => Ok(flash_redirect(session, FlashCategory::Warning, "گزارش مورد نظر یافت نشد.", "/")),
    }
}

/// Create or update, depending on whether the form carries a `report_id`
#[handler]
pub async fn submit(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Data(user): Data<&CurrentUser>,
    Form(form): Form<ReportForm>,
) -> Result<Response, WebError> {
    let report_id = form
        .report_id()
        .map_err(|raw| WebError::bad_request(format!("شناسه گزارش نامعتبر است: {raw}")))?;
    let fields = form.fields();

    let conn = app.database.open().await?;
    let outcome = app
        .report_store
        .submit_report(&conn, report_id, &fields, &user.display_name)
        .await;

    match outcome {
        Ok(SubmitOutcome::Created(id)) => {
            tracing::info!("Report {} created by {}", id, user.username);
            Ok(flash_redirect(session, FlashCategory::Success, "گزارش با موفقیت ثبت شد.", "/"))
        }
        Ok(SubmitOutcome::Updated(id)) => {
            tracing::info!("Report {} updated by {}", id, user.username);
            Ok(flash_redirect(session, FlashCategory::Success, "گزارش با موفقیت ویرایش شد.", "/"))
        }
        Err(InternalError::Report(ReportError::NotFound(_))) => {
            Ok(flash_redirect(session, FlashCategory::Warning, "گزارش مورد نظر یافت نشد.", "/"))
        }
        Err(e) => Err(e.into()),
    }
}

#[handler]
pub async fn delete(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Data(user): Data<&CurrentUser>,
    Path(report_id): Path<i32>,
) -> Result<Response, WebError> {
    let removed = {
        let conn = app.database.open().await?;
        app.report_store.delete_report(&conn, report_id).await?
    };

    if removed {
        tracing::info!("Report {} deleted by {}", report_id, user.username);
        Ok(flash_redirect(session, FlashCategory::Success, "گزارش حذف شد.", "/"))
    } else {
        Ok(redirect("/"))
    }
}

/// Delete every report whose id appears in a repeated `report_ids` field
#[handler]
pub async fn bulk_delete(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Data(user): Data<&CurrentUser>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let report_ids: Vec<i32> = pairs
        .into_iter()
        .filter(|(key, _)| key == "report_ids")
        .filter_map(|(_, value)| value.trim().parse().ok())
        .collect();

    let conn = app.database.open().await?;
    match app.report_store.bulk_delete(&conn, &report_ids).await {
        Ok(removed) => {
            tracing::info!("{} reports deleted by {}", removed, user.username);
            let message = format!("{} گزارش حذف شد.", to_persian_digits(&removed.to_string()));
            Ok(flash_redirect(session, FlashCategory::Success, message, "/"))
        }
        Err(InternalError::Report(ReportError::EmptySelection)) => {
            Ok(flash_redirect(session, FlashCategory::Warning, "هیچ گزارشی انتخاب نشده است.", "/"))
        }
        Err(e) => Err(e.into()),
    }
}

#[handler]
pub async fn arrears_report(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Data(user): Data<&CurrentUser>,
) -> Result<Html<String>, WebError> {
    let reports = {
        let conn = app.database.open().await?;
        app.report_store.list_arrears(&conn).await?
    };

    Ok(Html(views::reports::arrears(user, &take_flashes(session), &reports)))
}
