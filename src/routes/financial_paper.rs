use axum::{routing::{get, post}, Router};

use crate::app::AppState;
use crate::handler::financial_paper::{
    analyze_paper, delete_paper, get_paper, list_papers, patch_paper, upload_pdf,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_papers).post(upload_pdf))
        .route("/upload_pdf", post(upload_pdf))
        .route("/:id", get(get_paper).patch(patch_paper).delete(delete_paper))
        .route("/:id/analyze", get(analyze_paper))
}
