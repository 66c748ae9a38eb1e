use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::prelude::*;

use crate::schema::stock_daily;

#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = stock_daily)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StockDaily {
    pub id: i32,
    pub ts_code: String,
    pub trade_date: NaiveDate,
    pub open: BigDecimal,
    pub high: BigDecimal,
    pub low: BigDecimal,
    pub close: BigDecimal,
    pub volume: i64,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = stock_daily)]
pub struct NewStockDaily {
    pub ts_code: String,
    pub trade_date: NaiveDate,
    pub open: BigDecimal,
    pub high: BigDecimal,
    pub low: BigDecimal,
    pub close: BigDecimal,
    pub volume: i64,
}

#[derive(AsChangeset, Debug, Default, Clone)]
#[diesel(table_name = stock_daily)]
pub struct UpdateStockDaily {
    pub ts_code: Option<String>,
    pub trade_date: Option<NaiveDate>,
    pub open: Option<BigDecimal>,
    pub high: Option<BigDecimal>,
    pub low: Option<BigDecimal>,
    pub close: Option<BigDecimal>,
    pub volume: Option<i64>,
}

impl UpdateStockDaily {
    /// Changeset that overwrites every field of an existing row.
    pub fn replace_with(rec: &NewStockDaily) -> Self {
        Self {
            ts_code: Some(rec.ts_code.clone()),
            trade_date: Some(rec.trade_date),
            open: Some(rec.open.clone()),
            high: Some(rec.high.clone()),
            low: Some(rec.low.clone()),
            close: Some(rec.close.clone()),
            volume: Some(rec.volume),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ts_code.is_none()
            && self.trade_date.is_none()
            && self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.volume.is_none()
    }
}
