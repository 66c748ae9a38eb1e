//! 股票日行情 CSV 导入
//!
//! 必须包含列: ts_code, trade_date, open, high, low, close, volume。
//! 缺列时整个请求失败，不写入任何数据；单行解析或写入失败只记录错误，
//! 继续处理后续行。

use std::fmt::Display;

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;

use crate::models::NewStockDaily;
use crate::repositories::stock_daily::{self, UpsertOutcome};
use crate::repositories::PgPoolConn;
use crate::utils::stock_fields::{
    normalize_ts_code, parse_price, parse_trade_date, parse_volume, FieldError,
};

pub const REQUIRED_COLUMNS: [&str; 7] = [
    "ts_code",
    "trade_date",
    "open",
    "high",
    "low",
    "close",
    "volume",
];

/// 响应中最多返回的错误条数
pub const MAX_SURFACED_ERRORS: usize = 5;

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("file is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("CSV file is empty")]
    Empty,
    #[error("CSV file is missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// 导入目标存储，按 (ts_code, trade_date) upsert
pub trait StockDailyStore {
    type Error: Display;

    fn upsert(&mut self, rec: &NewStockDaily) -> Result<UpsertOutcome, Self::Error>;
}

impl StockDailyStore for PgPoolConn {
    type Error = diesel::result::Error;

    fn upsert(&mut self, rec: &NewStockDaily) -> Result<UpsertOutcome, Self::Error> {
        stock_daily::upsert(self, rec).map(|(_, outcome)| outcome)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    /// 仅保留前 MAX_SURFACED_ERRORS 条
    pub errors: Vec<String>,
}

impl ImportSummary {
    fn record_error(&mut self, msg: String) {
        self.failed += 1;
        if self.errors.len() < MAX_SURFACED_ERRORS {
            self.errors.push(msg);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    ts_code: usize,
    trade_date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, CsvImportError> {
        for name in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h.trim() == name) {
                return Err(CsvImportError::MissingColumn(name));
            }
        }
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(CsvImportError::MissingColumn(name))
        };
        Ok(Self {
            ts_code: find("ts_code")?,
            trade_date: find("trade_date")?,
            open: find("open")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
            volume: find("volume")?,
        })
    }

    fn parse_row(&self, record: &StringRecord) -> Result<NewStockDaily, String> {
        Ok(NewStockDaily {
            ts_code: column(record, self.ts_code, "ts_code", normalize_ts_code)?,
            trade_date: column(record, self.trade_date, "trade_date", parse_trade_date)?,
            open: column(record, self.open, "open", parse_price)?,
            high: column(record, self.high, "high", parse_price)?,
            low: column(record, self.low, "low", parse_price)?,
            close: column(record, self.close, "close", parse_price)?,
            volume: column(record, self.volume, "volume", parse_volume)?,
        })
    }
}

fn column<T>(
    record: &StringRecord,
    idx: usize,
    name: &str,
    parse: impl Fn(&str) -> Result<T, FieldError>,
) -> Result<T, String> {
    let raw = record
        .get(idx)
        .ok_or_else(|| format!("{}: missing value", name))?;
    parse(raw).map_err(|e| format!("{}: {}", name, e))
}

/// 已通过表头校验、尚未写入任何数据的 CSV
pub struct StockCsv<'a> {
    reader: csv::Reader<&'a [u8]>,
    columns: ColumnIndex,
}

impl<'a> StockCsv<'a> {
    /// 解码（兼容 UTF-8 BOM）并校验表头
    pub fn open(bytes: &'a [u8]) -> Result<Self, CsvImportError> {
        let text = std::str::from_utf8(bytes)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(CsvImportError::Empty);
        }
        let columns = ColumnIndex::from_headers(&headers)?;

        Ok(Self { reader, columns })
    }

    /// 逐行解析并 upsert，单行失败不会中断导入
    pub fn import_into<S: StockDailyStore>(mut self, store: &mut S) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for (idx, result) in self.reader.records().enumerate() {
            // 表头占第 1 行
            let fallback_line = idx as u64 + 2;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                    tracing::warn!("CSV row {} unreadable: {}", line, e);
                    summary.record_error(format!("row {}: {}", line, e));
                    continue;
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);

            let rec = match self.columns.parse_row(&record) {
                Ok(rec) => rec,
                Err(msg) => {
                    tracing::warn!("CSV row {} skipped: {}", line, msg);
                    summary.record_error(format!("row {}: {}", line, msg));
                    continue;
                }
            };

            match store.upsert(&rec) {
                Ok(UpsertOutcome::Created) => summary.created += 1,
                Ok(UpsertOutcome::Updated) => summary.updated += 1,
                Err(e) => {
                    tracing::warn!(
                        "CSV row {} write failed for {} on {}: {}",
                        line,
                        rec.ts_code,
                        rec.trade_date,
                        e
                    );
                    summary.record_error(format!(
                        "row {}: failed to save {} on {}: {}",
                        line, rec.ts_code, rec.trade_date, e
                    ));
                }
            }
        }

        summary
    }
}

/// 校验并导入整份 CSV
pub fn import_stock_csv<S: StockDailyStore>(
    bytes: &[u8],
    store: &mut S,
) -> Result<ImportSummary, CsvImportError> {
    let csv = StockCsv::open(bytes)?;
    Ok(csv.import_into(store))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        rows: BTreeMap<(String, NaiveDate), NewStockDaily>,
        writes: usize,
        reject_code: Option<String>,
    }

    impl StockDailyStore for MemoryStore {
        type Error = String;

        fn upsert(&mut self, rec: &NewStockDaily) -> Result<UpsertOutcome, Self::Error> {
            if self.reject_code.as_deref() == Some(rec.ts_code.as_str()) {
                return Err("simulated write failure".to_string());
            }
            self.writes += 1;
            let key = (rec.ts_code.clone(), rec.trade_date);
            match self.rows.insert(key, rec.clone()) {
                None => Ok(UpsertOutcome::Created),
                Some(_) => Ok(UpsertOutcome::Updated),
            }
        }
    }

    const SAMPLE: &str = "ts_code,trade_date,open,high,low,close,volume\n\
        600000.SH,20240102,10.10,10.50,9.90,10.30,123456\n\
        600000.SH,20240103,10.30,10.80,10.20,10.70,234567\n\
        000001.SZ,20240102,8.00,8.20,7.90,8.10,345678\n";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_import_creates_every_row() {
        let mut store = MemoryStore::default();
        let summary = import_stock_csv(SAMPLE.as_bytes(), &mut store).unwrap();

        assert_eq!(summary.created, 3);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.failed, 0);
        assert!(summary.errors.is_empty());

        let rec = &store.rows[&("600000.SH".to_string(), date(2024, 1, 3))];
        assert_eq!(rec.close.to_string(), "10.70");
        assert_eq!(rec.volume, 234567);
    }

    #[test]
    fn test_reimport_is_idempotent() {
        let mut store = MemoryStore::default();
        import_stock_csv(SAMPLE.as_bytes(), &mut store).unwrap();
        let second = import_stock_csv(SAMPLE.as_bytes(), &mut store).unwrap();

        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 3);
        assert_eq!(store.rows.len(), 3);
    }

    #[test]
    fn test_reimport_overwrites_prices() {
        let mut store = MemoryStore::default();
        import_stock_csv(SAMPLE.as_bytes(), &mut store).unwrap();

        let changed = "ts_code,trade_date,open,high,low,close,volume\n\
            600000.SH,20240102,11,12,10.5,11.555,99.9\n";
        let summary = import_stock_csv(changed.as_bytes(), &mut store).unwrap();
        assert_eq!(summary.updated, 1);

        let rec = &store.rows[&("600000.SH".to_string(), date(2024, 1, 2))];
        assert_eq!(rec.open.to_string(), "11.00");
        assert_eq!(rec.close.to_string(), "11.56");
        assert_eq!(rec.volume, 99);
    }

    #[test]
    fn test_bad_rows_do_not_abort_batch() {
        let csv = "ts_code,trade_date,open,high,low,close,volume\n\
            600000.SH,2024-01-02,10,11,9,10,100\n\
            600000.SH,20240103,abc,11,9,10,100\n\
            600000.SH,20240104,10,11,9,10,100\n";
        let mut store = MemoryStore::default();
        let summary = import_stock_csv(csv.as_bytes(), &mut store).unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.errors.len(), 2);
        assert!(summary.errors[0].starts_with("row 2: trade_date"));
        assert!(summary.errors[1].starts_with("row 3: open"));
        assert!(store.rows.contains_key(&("600000.SH".to_string(), date(2024, 1, 4))));
    }

    #[test]
    fn test_exponent_price_is_a_row_error() {
        let csv = "ts_code,trade_date,open,high,low,close,volume\n\
            600000.SH,20240102,10,1e1000000000,9,10,100\n\
            600000.SH,20240103,10,11,9,10,100\n";
        let mut store = MemoryStore::default();
        let summary = import_stock_csv(csv.as_bytes(), &mut store).unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.errors[0].starts_with("row 2: high"));
        assert!(summary.errors[0].contains("does not fit numeric(10,2)"));
    }

    #[test]
    fn test_missing_column_rejects_before_any_write() {
        let csv = "ts_code,trade_date,open,high,low,close\n\
            600000.SH,20240102,10,11,9,10\n";
        let mut store = MemoryStore::default();
        let err = import_stock_csv(csv.as_bytes(), &mut store).unwrap_err();

        assert!(matches!(err, CsvImportError::MissingColumn("volume")));
        assert_eq!(store.writes, 0);
    }

    #[test]
    fn test_first_missing_column_is_reported() {
        let csv = "symbol,date,open,high,low,close,volume\n";
        let err = StockCsv::open(csv.as_bytes()).err().unwrap();
        assert_eq!(
            err.to_string(),
            "CSV file is missing required column: ts_code"
        );
    }

    #[test]
    fn test_bom_and_padded_headers_are_accepted() {
        let csv = "\u{feff}ts_code, trade_date ,open,high,low,close,volume,amount\n\
            \u{20}600000.SH ,20240102,10,11,9,10,100,1000\n";
        let mut store = MemoryStore::default();
        let summary = import_stock_csv(csv.as_bytes(), &mut store).unwrap();

        assert_eq!(summary.created, 1);
        assert!(store.rows.contains_key(&("600000.SH".to_string(), date(2024, 1, 2))));
    }

    #[test]
    fn test_columns_may_appear_in_any_order() {
        let csv = "volume,close,low,high,open,trade_date,ts_code\n\
            500,10.5,9.5,11,10,20240105,000001.SZ\n";
        let mut store = MemoryStore::default();
        let summary = import_stock_csv(csv.as_bytes(), &mut store).unwrap();

        assert_eq!(summary.created, 1);
        let rec = &store.rows[&("000001.SZ".to_string(), date(2024, 1, 5))];
        assert_eq!(rec.high.to_string(), "11.00");
        assert_eq!(rec.volume, 500);
    }

    #[test]
    fn test_only_first_five_errors_are_kept() {
        let mut csv = String::from("ts_code,trade_date,open,high,low,close,volume\n");
        for _ in 0..8 {
            csv.push_str("600000.SH,bad,10,11,9,10,100\n");
        }
        csv.push_str("600000.SH,20240102,10,11,9,10,100\n");

        let mut store = MemoryStore::default();
        let summary = import_stock_csv(csv.as_bytes(), &mut store).unwrap();

        assert_eq!(summary.failed, 8);
        assert_eq!(summary.errors.len(), MAX_SURFACED_ERRORS);
        assert_eq!(summary.created, 1);
    }

    #[test]
    fn test_short_row_reports_missing_value() {
        let csv = "ts_code,trade_date,open,high,low,close,volume\n\
            600000.SH,20240102,10,11\n";
        let mut store = MemoryStore::default();
        let summary = import_stock_csv(csv.as_bytes(), &mut store).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors[0], "row 2: low: missing value");
    }

    #[test]
    fn test_store_failure_is_isolated() {
        let mut store = MemoryStore {
            reject_code: Some("000001.SZ".to_string()),
            ..Default::default()
        };
        let summary = import_stock_csv(SAMPLE.as_bytes(), &mut store).unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(summary.failed, 1);
        assert!(summary.errors[0].contains("simulated write failure"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let csv = "ts_code,trade_date,open,high,low,close,volume\n\n\
            600000.SH,20240102,10,11,9,10,100\n\n";
        let mut store = MemoryStore::default();
        let summary = import_stock_csv(csv.as_bytes(), &mut store).unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_request_level_failures() {
        assert!(matches!(
            StockCsv::open(b"").err().unwrap(),
            CsvImportError::Empty
        ));
        assert!(matches!(
            StockCsv::open(&[0xff, 0xfe, 0x00]).err().unwrap(),
            CsvImportError::Encoding(_)
        ));
    }
}
