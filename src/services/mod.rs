pub mod paper_analysis;
pub mod paper_storage;
pub mod stock_csv_import;
