use std::sync::Arc;

use poem::session::Session;
use poem::web::{Data, Form, Html, Path};
use poem::{IntoResponse, Response, handler};

use crate::api::helpers::{flash_redirect, take_flashes};
use crate::app_data::AppData;
use crate::errors::internal::CredentialError;
use crate::errors::{InternalError, WebError};
use crate::stores::{NewUser, UserUpdate};
use crate::types::dto::UserForm;
use crate::types::internal::{CurrentUser, FlashCategory, Role};
use crate::views;

#[handler]
pub async fn list(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Data(current): Data<&CurrentUser>,
) -> Result<Html<String>, WebError> {
    let users = {
        let conn = app.database.open().await?;
        app.credential_store.list_users(&conn).await?
    };

    Ok(Html(views::users::list(current, &take_flashes(session), &users)))
}

#[handler]
pub async fn add_page(session: &Session, Data(current): Data<&CurrentUser>) -> Html<String> {
    Html(views::users::form(current, &take_flashes(session), None))
}

#[handler]
pub async fn edit_page(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Data(current): Data<&CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<Response, WebError> {
    let user = {
        let conn = app.database.open().await?;
        app.credential_store.find_by_id(&conn, &user_id).await?
    };

    match user {
        Some(user) => Ok(Html(views::users::form(current, &take_flashes(session), Some(&user))).into_response()),
        None => Ok(flash_redirect(session, FlashCategory::Warning, "کاربر مورد نظر یافت نشد.", "/users")),
    }
}

/// Create a user, or update one when the form carries a `user_id`
#[handler]
pub async fn submit(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Data(current): Data<&CurrentUser>,
    Form(form): Form<UserForm>,
) -> Result<Response, WebError> {
    let user_id = form.user_id.as_deref().map(str::trim).filter(|id| !id.is_empty());
    let back = match user_id {
        Some(id) => format!("/edit_user/{id}"),
        None => "/add_user".to_string(),
    };

    let Ok(role) = form.role.parse::<Role>() else {
        return Ok(flash_redirect(session, FlashCategory::Danger, "نقش انتخاب‌شده نامعتبر است.", &back));
    };
    let display_name = form.display_name.trim().to_string();
    if display_name.is_empty() {
        return Ok(flash_redirect(session, FlashCategory::Danger, "نام نمایشی الزامی است.", &back));
    }

    let conn = app.database.open().await?;

    let result = match user_id {
        Some(id) => {
            let update = UserUpdate { display_name, role, new_password: Some(form.password) };
            app.credential_store.update_user(&conn, id, update).await.map(|_| "کاربر با موفقیت ویرایش شد.")
        }
        None => {
            let username = form.username.trim().to_string();
            if username.is_empty() {
                return Ok(flash_redirect(session, FlashCategory::Danger, "نام کاربری الزامی است.", &back));
            }
            let new_user = NewUser { username, password: form.password, display_name, role };
            app.credential_store.create_user(&conn, new_user).await.map(|_| "کاربر با موفقیت ایجاد شد.")
        }
    };

    match result {
        Ok(message) => {
            tracing::info!("User form submitted by {}", current.username);
            Ok(flash_redirect(session, FlashCategory::Success, message, "/users"))
        }
        Err(InternalError::Credential(CredentialError::DuplicateUsername(_))) => {
            Ok(flash_redirect(session, FlashCategory::Danger, "این نام کاربری قبلاً ثبت شده است.", &back))
        }
        Err(InternalError::Credential(CredentialError::EmptyPassword)) => {
            Ok(flash_redirect(session, FlashCategory::Danger, "رمز عبور الزامی است.", &back))
        }
        Err(InternalError::Credential(CredentialError::UserNotFound(_))) => {
            Ok(flash_redirect(session, FlashCategory::Warning, "کاربر مورد نظر یافت نشد.", "/users"))
        }
        Err(e) => Err(e.into()),
    }
}

#[handler]
pub async fn delete(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Data(current): Data<&CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<Response, WebError> {
    let conn = app.database.open().await?;

    match app.credential_store.delete_user(&conn, &user_id, &current.id).await {
        Ok(true) => {
            tracing::info!("User {} deleted by {}", user_id, current.username);
            Ok(flash_redirect(session, FlashCategory::Success, "کاربر حذف شد.", "/users"))
        }
        Ok(false) => Ok(flash_redirect(session, FlashCategory::Info, "کاربر قبلاً حذف شده است.", "/users")),
        Err(InternalError::Credential(CredentialError::SelfDeletion)) => {
            Ok(flash_redirect(session, FlashCategory::Danger, "نمی‌توانید حساب کاربری خود را حذف کنید.", "/users"))
        }
        Err(e) => Err(e.into()),
    }
}
