use diesel::prelude::*;

use crate::schema::books;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = books)]
pub struct NewBook {
    pub title: String,
    pub author: String,
}

#[derive(AsChangeset, Debug, Default, Clone)]
#[diesel(table_name = books)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
}
