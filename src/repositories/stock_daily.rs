use diesel::prelude::*;
use diesel::OptionalExtension;

use crate::models::{NewStockDaily, StockDaily, UpdateStockDaily};
use crate::repositories::PgPoolConn;
use crate::schema::stock_daily::dsl::*;

/// upsert 的结果：新建还是覆盖已有记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

#[derive(Debug, Default, Clone)]
pub struct StockDailyFilter {
    pub ts_code: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

pub fn create(conn: &mut PgPoolConn, new_rec: &NewStockDaily) -> Result<StockDaily, diesel::result::Error> {
    diesel::insert_into(stock_daily)
        .values(new_rec)
        .get_result(conn)
}

pub fn find_by_id(conn: &mut PgPoolConn, rec_id: i32) -> Result<StockDaily, diesel::result::Error> {
    stock_daily.find(rec_id).first(conn)
}

/// 按交易日期倒序列出，同一天内按代码升序
pub fn list(conn: &mut PgPoolConn, filter: &StockDailyFilter) -> Result<Vec<StockDaily>, diesel::result::Error> {
    let mut query = stock_daily.into_boxed();
    if let Some(code) = &filter.ts_code {
        query = query.filter(ts_code.eq(code.as_str()));
    }
    query
        .order((trade_date.desc(), ts_code.asc(), id.desc()))
        .limit(filter.limit)
        .offset(filter.offset)
        .load(conn)
}

pub fn update_by_id(
    conn: &mut PgPoolConn,
    rec_id: i32,
    update_data: &UpdateStockDaily,
) -> Result<StockDaily, diesel::result::Error> {
    diesel::update(stock_daily.find(rec_id))
        .set(update_data)
        .get_result(conn)
}

pub fn delete_by_id(conn: &mut PgPoolConn, rec_id: i32) -> Result<usize, diesel::result::Error> {
    diesel::delete(stock_daily.find(rec_id)).execute(conn)
}

/// 按 (ts_code, trade_date) 插入或覆盖
///
/// 单条记录一个事务：先 `SELECT ... FOR UPDATE` 锁住已有行，
/// 存在则覆盖价格与成交量，不存在则插入。
pub fn upsert(
    conn: &mut PgPoolConn,
    rec: &NewStockDaily,
) -> Result<(StockDaily, UpsertOutcome), diesel::result::Error> {
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let existing = stock_daily
            .filter(ts_code.eq(rec.ts_code.as_str()))
            .filter(trade_date.eq(rec.trade_date))
            .select(id)
            .for_update()
            .first::<i32>(conn)
            .optional()?;

        match existing {
            Some(existing_id) => {
                let changes = UpdateStockDaily {
                    ts_code: None,
                    trade_date: None,
                    ..UpdateStockDaily::replace_with(rec)
                };
                let updated = diesel::update(stock_daily.find(existing_id))
                    .set(&changes)
                    .get_result(conn)?;
                Ok((updated, UpsertOutcome::Updated))
            }
            None => {
                let created = diesel::insert_into(stock_daily)
                    .values(rec)
                    .get_result(conn)?;
                Ok((created, UpsertOutcome::Created))
            }
        }
    })
}
