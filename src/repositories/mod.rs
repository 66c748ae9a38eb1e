use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, PooledConnection};

pub mod book;
pub mod financial_paper;
pub mod stock_daily;

pub type PgPoolConn = PooledConnection<ConnectionManager<PgConnection>>;
