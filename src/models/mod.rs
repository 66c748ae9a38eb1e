pub mod book;
pub mod financial_paper;
pub mod stock_daily;

pub use book::{Book, NewBook, UpdateBook};
pub use financial_paper::{FinancialPaper, NewFinancialPaper, UpdateFinancialPaper};
pub use stock_daily::{NewStockDaily, StockDaily, UpdateStockDaily};
