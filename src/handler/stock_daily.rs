use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bigdecimal::BigDecimal;

use crate::api_models::stock_daily::{
    CreateStockDaily, StockDailyListQuery, StockDailyResponse, UpdateStockDailyRequest,
};
use crate::api_models::stock_import::ImportCsvResponse;
use crate::app::AppState;
use crate::handler::error::{map_db_err, multipart_err, pool_err, AppError};
use crate::models::{NewStockDaily, UpdateStockDaily};
use crate::repositories::stock_daily::{self, StockDailyFilter};
use crate::services::stock_csv_import::StockCsv;
use crate::utils::stock_fields::{normalize_ts_code, quantize_price, FieldError};

impl From<crate::models::StockDaily> for StockDailyResponse {
    fn from(d: crate::models::StockDaily) -> Self {
        Self {
            id: d.id,
            ts_code: d.ts_code,
            trade_date: d.trade_date,
            open: d.open,
            high: d.high,
            low: d.low,
            close: d.close,
            volume: d.volume,
        }
    }
}

fn field_err(name: &str) -> impl Fn(FieldError) -> AppError + '_ {
    move |e| AppError::BadRequest(format!("{}: {}", name, e))
}

fn price_opt(value: Option<BigDecimal>, name: &str) -> Result<Option<BigDecimal>, AppError> {
    value.map(quantize_price).transpose().map_err(field_err(name))
}

fn validate_new(payload: CreateStockDaily) -> Result<NewStockDaily, AppError> {
    Ok(NewStockDaily {
        ts_code: normalize_ts_code(&payload.ts_code).map_err(field_err("ts_code"))?,
        trade_date: payload.trade_date,
        open: quantize_price(payload.open).map_err(field_err("open"))?,
        high: quantize_price(payload.high).map_err(field_err("high"))?,
        low: quantize_price(payload.low).map_err(field_err("low"))?,
        close: quantize_price(payload.close).map_err(field_err("close"))?,
        volume: payload.volume,
    })
}

fn validate_update(payload: UpdateStockDailyRequest) -> Result<UpdateStockDaily, AppError> {
    Ok(UpdateStockDaily {
        ts_code: payload
            .ts_code
            .as_deref()
            .map(normalize_ts_code)
            .transpose()
            .map_err(field_err("ts_code"))?,
        trade_date: payload.trade_date,
        open: price_opt(payload.open, "open")?,
        high: price_opt(payload.high, "high")?,
        low: price_opt(payload.low, "low")?,
        close: price_opt(payload.close, "close")?,
        volume: payload.volume,
    })
}

/// 日行情列表，按交易日期倒序
pub async fn list_stock_daily(
    State(state): State<AppState>,
    Query(q): Query<StockDailyListQuery>,
) -> Result<Json<Vec<StockDailyResponse>>, AppError> {
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let filter = StockDailyFilter {
        ts_code: q
            .ts_code
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        limit: q.limit(),
        offset: q.offset(),
    };
    let items = stock_daily::list(&mut conn, &filter).map_err(map_db_err)?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

pub async fn create_stock_daily(
    State(state): State<AppState>,
    Json(payload): Json<CreateStockDaily>,
) -> Result<(StatusCode, Json<StockDailyResponse>), AppError> {
    let new_rec = validate_new(payload)?;
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let created = stock_daily::create(&mut conn, &new_rec).map_err(map_db_err)?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn get_stock_daily(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StockDailyResponse>, AppError> {
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let found = stock_daily::find_by_id(&mut conn, id).map_err(map_db_err)?;
    Ok(Json(found.into()))
}

/// PUT：所有字段整体替换
pub async fn replace_stock_daily(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CreateStockDaily>,
) -> Result<Json<StockDailyResponse>, AppError> {
    let rec = validate_new(payload)?;
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let updated = stock_daily::update_by_id(&mut conn, id, &UpdateStockDaily::replace_with(&rec))
        .map_err(map_db_err)?;
    Ok(Json(updated.into()))
}

/// PATCH：只更新传入的字段
pub async fn patch_stock_daily(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStockDailyRequest>,
) -> Result<Json<StockDailyResponse>, AppError> {
    let changes = validate_update(payload)?;
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let rec = if changes.is_empty() {
        stock_daily::find_by_id(&mut conn, id)
    } else {
        stock_daily::update_by_id(&mut conn, id, &changes)
    }
    .map_err(map_db_err)?;
    Ok(Json(rec.into()))
}

pub async fn delete_stock_daily(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let affected = stock_daily::delete_by_id(&mut conn, id).map_err(map_db_err)?;
    if affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// 取出 multipart 中名为 `file` 的字段
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<(String, Bytes)>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("upload.csv").to_string();
            let data = field.bytes().await.map_err(multipart_err)?;
            return Ok(Some((name, data)));
        }
    }
    Ok(None)
}

/// 上传 CSV 并按 (ts_code, trade_date) 导入
///
/// 表头校验在获取数据库连接之前完成，缺列时不会有任何写入。
pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportCsvResponse>, AppError> {
    let (file_name, bytes) = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::BadRequest("no file uploaded".to_string()))?;
    tracing::info!("Received CSV upload {} ({} bytes)", file_name, bytes.len());

    let csv = StockCsv::open(&bytes).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let summary = csv.import_into(&mut conn);

    tracing::info!(
        "CSV import {} finished: created={}, updated={}, failed={}",
        file_name,
        summary.created,
        summary.updated,
        summary.failed
    );

    Ok(Json(ImportCsvResponse {
        message: "import finished".to_string(),
        created: summary.created,
        updated: summary.updated,
        failed: summary.failed,
        errors: summary.errors,
    }))
}
