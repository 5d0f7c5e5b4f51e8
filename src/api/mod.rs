// API layer - HTTP endpoints
pub mod auth;
pub mod backup;
pub mod bulk;
pub mod gate;
pub mod health;
pub mod helpers;
pub mod reports;
pub mod units;
pub mod upload;
pub mod users;

use std::sync::Arc;

use poem::middleware::Tracing;
use poem::session::{CookieConfig, CookieSession};
use poem::web::cookie::{CookieKey, SameSite};
use poem::{Endpoint, EndpointExt, IntoEndpoint, Route, get, post};
use poem_openapi::OpenApiService;
use sha2::{Digest, Sha512};

pub use gate::Authorize;
pub use health::HealthApi;
pub use units::UnitsApi;

use crate::app_data::AppData;
use crate::config::Settings;
use crate::services::Permission;

pub const SESSION_COOKIE_NAME: &str = "payment_reports_session";

fn signed_in<E: Endpoint>(ep: E) -> impl Endpoint {
    ep.with(Authorize::new(Permission::Authenticated))
}

fn editor<E: Endpoint>(ep: E) -> impl Endpoint {
    ep.with(Authorize::new(Permission::EditorOrAdmin))
}

fn admin<E: Endpoint>(ep: E) -> impl Endpoint {
    ep.with(Authorize::new(Permission::Admin))
}

/// Signing key for the session cookie, derived from `SECRET_KEY`
fn session_key(settings: &Settings) -> CookieKey {
    match settings.secret_key() {
        Some(secret) => CookieKey::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => {
            tracing::warn!("SECRET_KEY is not set; sessions will not survive a restart");
            CookieKey::generate()
        }
    }
}

/// Assemble the full route tree around `app`
pub fn build_app(app: Arc<AppData>) -> impl Endpoint {
    let cookie = CookieConfig::signed(session_key(&app.settings))
        .name(SESSION_COOKIE_NAME)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(app.settings.session_cookie_secure());

    let version = env!("CARGO_PKG_VERSION");
    let units_api = OpenApiService::new(UnitsApi, "Catalog", version);
    let health_api = OpenApiService::new(HealthApi, "Payment reports", version);

    Route::new()
        .at("/login", get(auth::login_page).post(auth::login))
        .at("/logout", get(signed_in(auth::logout)))
        .at("/", get(signed_in(reports::index)))
        .at("/add", get(signed_in(reports::add_page)))
        .at("/edit/:id", get(signed_in(reports::edit_page)))
        .at("/submit", post(signed_in(reports::submit)))
        .at("/delete/:id", post(signed_in(reports::delete)))
        .at("/bulk_delete", post(signed_in(reports::bulk_delete)))
        .nest("/get_units", signed_in(units_api.into_endpoint()))
        .at("/arrears_report", get(editor(reports::arrears_report)))
        .at("/bulk_upload", get(editor(bulk::upload_page)))
        .at("/process_bulk_upload", post(editor(bulk::process_upload)))
        .at("/users", get(admin(users::list)))
        .at("/add_user", get(admin(users::add_page)))
        .at("/edit_user/:id", get(admin(users::edit_page)))
        .at("/submit_user", post(admin(users::submit)))
        .at("/delete_user/:id", post(admin(users::delete)))
        .at("/backup", get(admin(backup::download)))
        .at("/restore", post(admin(backup::restore)))
        .nest("/api", health_api)
        .with(CookieSession::new(cookie))
        .with(Tracing)
        .data(app)
}
