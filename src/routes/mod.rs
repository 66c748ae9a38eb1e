use axum::Router;

use crate::app::AppState;

mod book;
mod financial_paper;
mod root;
mod stock_daily;

pub fn build_routes() -> Router<AppState> {
    Router::new()
        // 根路径与健康检查
        .merge(root::router())
        // 业务 API 统一挂在 /api 前缀下
        .nest(
            "/api",
            Router::new()
                .nest("/stocks", stock_daily::router())
                .nest("/books", book::router())
                .nest("/papers", financial_paper::router()),
        )
}
