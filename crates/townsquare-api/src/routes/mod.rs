//! Route modules and the assembled application router.

use axum::Router;

use crate::state::AppState;

pub mod areas;
pub mod connect;
pub mod health;
pub mod towns;

/// Returns the full application router, without middleware or state.
pub fn router() -> Router<AppState> {
    Router::new().merge(health::router()).nest(
        "/api/v1/towns",
        towns::router()
            .merge(areas::router())
            .merge(connect::router()),
    )
}
