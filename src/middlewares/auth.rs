use anyhow::anyhow;
use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use crate::{
    error::{AppError, AppResult},
    models::sessions::{CurrentUser, UserSession},
};

pub async fn auth_middleware(
    session: Session,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    // Check if the session has a user session
    match session.get::<UserSession>("user").await {
        Ok(Some(user_session)) => {
            req.extensions_mut().insert(CurrentUser(user_session.user_id));
            Ok(next.run(req).await)
        }
        Ok(None) => Err(AppError::Unauthorized(anyhow!("Unauthorized"))),
        Err(e) => Err(AppError::InternalServerError(anyhow!(
            "Failed to read session: {}",
            e
        ))),
    }
}
