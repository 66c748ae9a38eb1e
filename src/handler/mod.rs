pub mod book;
pub mod error;
pub mod financial_paper;
pub mod stock_daily;
