//! API 路由模块
//!
//! Thin adapters over the engines; no booking logic lives here.
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`messages`] - 聊天入口 (`handle_message`)
//! - [`providers`] - 工作日、时段、时间表
//! - [`services`] - 服务项目
//! - [`appointments`] - 预约
//! - [`clients`] - 客户

pub mod appointments;
pub mod clients;
pub mod health;
pub mod messages;
pub mod providers;
pub mod services;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(messages::router())
        .merge(providers::router())
        .merge(services::router())
        .merge(appointments::router())
        .merge(clients::router())
}

/// Build the application with middleware and state
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(
            ServiceBuilder::new()
                // Request tracing, outermost
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
