use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api_models::book::{BookResponse, CreateBook, UpdateBookRequest};
use crate::app::AppState;
use crate::handler::error::{map_db_err, pool_err, AppError};
use crate::models::{NewBook, UpdateBook};
use crate::repositories::book;

const TITLE_MAX_CHARS: usize = 100;
const AUTHOR_MAX_CHARS: usize = 50;

impl From<crate::models::Book> for BookResponse {
    fn from(b: crate::models::Book) -> Self {
        Self {
            id: b.id,
            title: b.title,
            author: b.author,
        }
    }
}

fn checked(value: &str, name: &str, max_chars: usize) -> Result<String, AppError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", name)));
    }
    if v.chars().count() > max_chars {
        return Err(AppError::BadRequest(format!(
            "{} must be at most {} characters",
            name, max_chars
        )));
    }
    Ok(v.to_string())
}

pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<BookResponse>>, AppError> {
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let items = book::list_all(&mut conn).map_err(map_db_err)?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

pub async fn create_book(
    State(state): State<AppState>,
    Json(payload): Json<CreateBook>,
) -> Result<(StatusCode, Json<BookResponse>), AppError> {
    let new_book = NewBook {
        title: checked(&payload.title, "title", TITLE_MAX_CHARS)?,
        author: checked(&payload.author, "author", AUTHOR_MAX_CHARS)?,
    };
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let created = book::create(&mut conn, &new_book).map_err(map_db_err)?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BookResponse>, AppError> {
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let found = book::find_by_id(&mut conn, id).map_err(map_db_err)?;
    Ok(Json(found.into()))
}

pub async fn replace_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CreateBook>,
) -> Result<Json<BookResponse>, AppError> {
    let update_data = UpdateBook {
        title: Some(checked(&payload.title, "title", TITLE_MAX_CHARS)?),
        author: Some(checked(&payload.author, "author", AUTHOR_MAX_CHARS)?),
    };
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let updated = book::update_by_id(&mut conn, id, &update_data).map_err(map_db_err)?;
    Ok(Json(updated.into()))
}

pub async fn patch_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBookRequest>,
) -> Result<Json<BookResponse>, AppError> {
    let update_data = UpdateBook {
        title: payload
            .title
            .as_deref()
            .map(|t| checked(t, "title", TITLE_MAX_CHARS))
            .transpose()?,
        author: payload
            .author
            .as_deref()
            .map(|a| checked(a, "author", AUTHOR_MAX_CHARS))
            .transpose()?,
    };
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let found = if update_data.title.is_none() && update_data.author.is_none() {
        book::find_by_id(&mut conn, id)
    } else {
        book::update_by_id(&mut conn, id, &update_data)
    }
    .map_err(map_db_err)?;
    Ok(Json(found.into()))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let affected = book::delete_by_id(&mut conn, id).map_err(map_db_err)?;
    if affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
