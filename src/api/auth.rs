use std::sync::Arc;

use poem::session::Session;
use poem::web::{Data, Form, Html};
use poem::{IntoResponse, Response, handler};

use crate::api::helpers::{USER_ID_KEY, flash_redirect, take_flashes};
use crate::app_data::AppData;
use crate::errors::internal::CredentialError;
use crate::errors::{InternalError, WebError};
use crate::types::dto::LoginForm;
use crate::types::internal::{Flash, FlashCategory};
use crate::views;

#[handler]
pub async fn login_page(session: &Session) -> Html<String> {
    Html(views::auth::login(&take_flashes(session)))
}

#[handler]
pub async fn login(
    session: &Session,
    Data(app): Data<&Arc<AppData>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let conn = app.database.open().await?;

    match app.credential_store.verify_credentials(&conn, &form.username, &form.password).await {
        Ok(user) => {
            tracing::info!("User {} logged in", user.username);
            session.renew();
            session.set(USER_ID_KEY, user.id);
            Ok(flash_redirect(session, FlashCategory::Success, "با موفقیت وارد شدید.", "/"))
        }
        Err(InternalError::Credential(CredentialError::InvalidCredentials)) => {
            tracing::info!("Failed login attempt for {}", form.username);
            let mut flashes = take_flashes(session);
            flashes.push(Flash::new(FlashCategory::Danger, "نام کاربری یا رمز عبور اشتباه است."));
            Ok(Html(views::auth::login(&flashes)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

#[handler]
pub async fn logout(session: &Session) -> Response {
    session.clear();
    flash_redirect(session, FlashCategory::Info, "با موفقیت خارج شدید.", "/login")
}
