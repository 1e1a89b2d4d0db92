pub mod groups;
use crate::app_state::AppState;
use axum::Router;

pub fn v1_routes() -> Router<AppState> {
    Router::new().nest("/groups", groups::groups_routes())
}
