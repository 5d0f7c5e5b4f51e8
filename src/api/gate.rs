use std::sync::Arc;

use poem::session::Session;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};

use crate::api::helpers::{USER_ID_KEY, redirect};
use crate::app_data::AppData;
use crate::errors::WebError;
use crate::services::access_policy::{Permission, authorize};
use crate::types::internal::CurrentUser;

/// Authorization gate for a route or route group
///
/// Resolves the session's user, consults the access policy and inserts the
/// resulting `CurrentUser` into the request, where handlers read it with
/// `Data<&CurrentUser>`. Unauthenticated requests go to `/login`, forbidden
/// ones to `/`.
pub struct Authorize {
    permission: Permission,
}

impl Authorize {
    pub fn new(permission: Permission) -> Self {
        Self { permission }
    }
}

impl<E: Endpoint> Middleware<E> for Authorize {
    type Output = AuthorizeEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        AuthorizeEndpoint { inner: ep, permission: self.permission }
    }
}

pub struct AuthorizeEndpoint<E> {
    inner: E,
    permission: Permission,
}

impl<E: Endpoint> Endpoint for AuthorizeEndpoint<E> {
    type Output = Response;

    async fn call(&self, mut req: Request) -> Result<Self::Output> {
        let Some(session) = req.extensions().get::<Session>().cloned() else {
            tracing::error!("Authorize gate mounted without a session middleware");
            return Err(WebError::Internal.into());
        };
        let Some(app) = req.data::<Arc<AppData>>().cloned() else {
            tracing::error!("Authorize gate mounted without application data");
            return Err(WebError::Internal.into());
        };

        let Some(user_id) = session.get::<String>(USER_ID_KEY) else {
            return Ok(redirect("/login"));
        };

        let user = {
            let conn = app.database.open().await.map_err(WebError::from)?;
            app.credential_store
                .find_by_id(&conn, &user_id)
                .await
                .map_err(WebError::from)?
        };

        let Some(user) = user else {
            // Account deleted while the session was alive
            session.purge();
            return Ok(redirect("/login"));
        };
        let current = CurrentUser::try_from(user).map_err(WebError::from)?;

        if let Err(denied) = authorize(current.role, self.permission) {
            tracing::debug!("{} denied: {}", current.username, denied);
            return Ok(redirect("/"));
        }

        req.extensions_mut().insert(current);
        self.inner.call(req).await.map(IntoResponse::into_response)
    }
}
