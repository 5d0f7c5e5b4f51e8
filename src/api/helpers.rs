use poem::session::Session;
use poem::web::Redirect;
use poem::{IntoResponse, Response};

use crate::types::internal::{Flash, FlashCategory};

/// Session key holding the authenticated user's id
pub const USER_ID_KEY: &str = "user_id";

const FLASH_KEY: &str = "_flashes";

/// Queue a message for the next rendered page
pub fn flash(session: &Session, category: FlashCategory, message: impl Into<String>) {
    let mut flashes: Vec<Flash> = session.get(FLASH_KEY).unwrap_or_default();
    flashes.push(Flash::new(category, message));
    session.set(FLASH_KEY, flashes);
}

/// Drain queued messages
pub fn take_flashes(session: &Session) -> Vec<Flash> {
    let flashes: Vec<Flash> = session.get(FLASH_KEY).unwrap_or_default();
    if !flashes.is_empty() {
        session.remove(FLASH_KEY);
    }
    flashes
}

/// 303 to `location`, so a POST is followed by a GET
pub fn redirect(location: &str) -> Response {
    Redirect::see_other(location).into_response()
}

/// Flash then redirect, the usual ending of a form handler
pub fn flash_redirect(session: &Session, category: FlashCategory, message: impl Into<String>, location: &str) -> Response {
    flash(session, category, message);
    redirect(location)
}
