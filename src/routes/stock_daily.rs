use axum::{routing::{get, post}, Router};

use crate::app::AppState;
use crate::handler::stock_daily::{
    create_stock_daily, delete_stock_daily, get_stock_daily, list_stock_daily, patch_stock_daily,
    replace_stock_daily, upload_csv,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stock_daily).post(create_stock_daily))
        .route("/upload_csv", post(upload_csv))
        .route(
            "/:id",
            get(get_stock_daily)
                .put(replace_stock_daily)
                .patch(patch_stock_daily)
                .delete(delete_stock_daily),
        )
}
