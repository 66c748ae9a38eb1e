pub mod book;
pub mod financial_paper;
pub mod stock_daily;
pub mod stock_import;

#[allow(unused_imports)]
pub use book::{BookResponse, CreateBook, UpdateBookRequest};
#[allow(unused_imports)]
pub use financial_paper::{FinancialPaperResponse, PaperAnalysisResponse, UpdateFinancialPaperRequest};
#[allow(unused_imports)]
pub use stock_daily::{CreateStockDaily, StockDailyListQuery, StockDailyResponse, UpdateStockDailyRequest};
#[allow(unused_imports)]
pub use stock_import::ImportCsvResponse;
