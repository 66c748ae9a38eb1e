use diesel::prelude::*;

use crate::models::{Book, NewBook, UpdateBook};
use crate::repositories::PgPoolConn;
use crate::schema::books::dsl::*;

pub fn create(conn: &mut PgPoolConn, new_book: &NewBook) -> Result<Book, diesel::result::Error> {
    diesel::insert_into(books)
        .values(new_book)
        .get_result(conn)
}

pub fn find_by_id(conn: &mut PgPoolConn, book_id: i32) -> Result<Book, diesel::result::Error> {
    books.find(book_id).first(conn)
}

pub fn list_all(conn: &mut PgPoolConn) -> Result<Vec<Book>, diesel::result::Error> {
    books.order(id.asc()).load(conn)
}

pub fn update_by_id(
    conn: &mut PgPoolConn,
    book_id: i32,
    update_data: &UpdateBook,
) -> Result<Book, diesel::result::Error> {
    diesel::update(books.find(book_id))
        .set(update_data)
        .get_result(conn)
}

pub fn delete_by_id(conn: &mut PgPoolConn, book_id: i32) -> Result<usize, diesel::result::Error> {
    diesel::delete(books.find(book_id)).execute(conn)
}
