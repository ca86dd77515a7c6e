//! Forum API Module
//!
//! Reads are public and filtered by the caller's category access; writes
//! need a signed-in caller.
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/forum/categories | GET | 无 |
//! | /api/forum/categories/{slug}/posts | GET | 无 |
//! | /api/forum/posts/{id} | GET | 无 |
//! | /api/forum/posts | POST | 登录 |
//! | /api/forum/posts/{id} | PUT/DELETE | 作者或员工 |
//! | /api/forum/posts/{id}/replies | POST | 登录 |
//! | /api/forum/replies/{id} | DELETE | 作者或员工 |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/api/forum/categories", get(handler::categories))
        .route("/api/forum/categories/{slug}/posts", get(handler::category_posts))
        .route("/api/forum/posts/{id}", get(handler::post_detail));

    let member_routes = Router::new()
        .route("/api/forum/posts", post(handler::create_post))
        .route(
            "/api/forum/posts/{id}",
            put(handler::update_post).delete(handler::delete_post),
        )
        .route("/api/forum/posts/{id}/replies", post(handler::create_reply))
        .route("/api/forum/replies/{id}", delete(handler::delete_reply))
        .layer(middleware::from_fn(require_auth));

    public_routes.merge(member_routes)
}
