use crate::handlers::v1::groups;
use crate::{app_state::AppState, middlewares::auth::auth_middleware};
use axum::routing::{get, post, put};
use axum::{middleware, Router};

pub fn groups_routes() -> Router<AppState> {
    // Protected routes that require authentication
    Router::new()
        .route("/", get(groups::list_groups).post(groups::create_group))
        .route("/{group_id}", get(groups::get_group))
        .route("/{group_id}/invitations", post(groups::invite_users))
        .route("/{group_id}/membership", put(groups::set_join_intent))
        .layer(middleware::from_fn(auth_middleware))
}
