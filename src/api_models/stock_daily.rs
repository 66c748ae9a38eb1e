use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 列表默认条数与上限
pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct CreateStockDaily {
    pub ts_code: String,
    pub trade_date: NaiveDate,
    pub open: BigDecimal,
    pub high: BigDecimal,
    pub low: BigDecimal,
    pub close: BigDecimal,
    pub volume: i64,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateStockDailyRequest {
    pub ts_code: Option<String>,
    pub trade_date: Option<NaiveDate>,
    pub open: Option<BigDecimal>,
    pub high: Option<BigDecimal>,
    pub low: Option<BigDecimal>,
    pub close: Option<BigDecimal>,
    pub volume: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct StockDailyListQuery {
    pub ts_code: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl StockDailyListQuery {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StockDailyResponse {
    pub id: i32,
    pub ts_code: String,
    pub trade_date: NaiveDate,
    pub open: BigDecimal,
    pub high: BigDecimal,
    pub low: BigDecimal,
    pub close: BigDecimal,
    pub volume: i64,
}
