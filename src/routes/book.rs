use axum::{routing::get, Router};

use crate::app::AppState;
use crate::handler::book::{create_book, delete_book, get_book, list_books, patch_book, replace_book};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/:id",
            get(get_book).put(replace_book).patch(patch_book).delete(delete_book),
        )
}
