use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: i32,
    pub title: String,
    pub author: String,
}
