use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use chrono::NaiveDate;
use thiserror::Error;

/// ts_code 列宽 varchar(20)
pub const TS_CODE_MAX_LEN: usize = 20;

/// numeric(10,2) 能容纳的绝对值上限（不含）
const PRICE_LIMIT: i64 = 100_000_000;

/// numeric(10,2) 的整数位数
const PRICE_INTEGER_DIGITS: i64 = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("ts_code must not be empty")]
    EmptyCode,
    #[error("ts_code '{0}' is longer than 20 characters")]
    CodeTooLong(String),
    #[error("invalid date '{0}', expected YYYYMMDD")]
    InvalidDate(String),
    #[error("invalid decimal '{0}'")]
    InvalidDecimal(String),
    #[error("value {0} does not fit numeric(10,2)")]
    OutOfRange(String),
    #[error("invalid integer '{0}'")]
    InvalidInteger(String),
}

/// 去掉首尾空白后的股票代码，空串或超长视为错误
pub fn normalize_ts_code(raw: &str) -> Result<String, FieldError> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(FieldError::EmptyCode);
    }
    if code.chars().count() > TS_CODE_MAX_LEN {
        return Err(FieldError::CodeTooLong(code.to_string()));
    }
    Ok(code.to_string())
}

/// 解析 YYYYMMDD 格式的交易日期（如 "20251226"）
pub fn parse_trade_date(raw: &str) -> Result<NaiveDate, FieldError> {
    let s = raw.trim();
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").map_err(|_| FieldError::InvalidDate(s.to_string()))
}

/// 将字符串解析为价格，并按四舍五入保留两位小数
pub fn parse_price(raw: &str) -> Result<BigDecimal, FieldError> {
    let s = raw.trim();
    let value = BigDecimal::from_str(s).map_err(|_| FieldError::InvalidDecimal(s.to_string()))?;
    quantize_price(value)
}

/// 价格统一为两位小数；超出 numeric(10,2) 范围返回错误
///
/// 指数形式（如 "1e1000000"）在重设精度前按整数位数拦截，
/// 避免 with_scale_round 展开出巨大的整数。
pub fn quantize_price(value: BigDecimal) -> Result<BigDecimal, FieldError> {
    let zero = BigDecimal::new(0.into(), 2);
    if value.is_zero() {
        return Ok(zero);
    }
    let integer_digits = value.digits() as i64 - value.fractional_digit_count();
    if integer_digits > PRICE_INTEGER_DIGITS {
        return Err(FieldError::OutOfRange(format!("{:e}", value)));
    }
    // |value| < 0.001，四舍五入后为 0.00
    if integer_digits < -2 {
        return Ok(zero);
    }
    let rounded = value.with_scale_round(2, RoundingMode::HalfUp);
    if rounded.abs() >= BigDecimal::from(PRICE_LIMIT) {
        return Err(FieldError::OutOfRange(rounded.to_string()));
    }
    Ok(rounded)
}

/// 成交量解析
///
/// 部分 CSV 的 volume 是小数（如 "12345.0"），先按整数解析，
/// 失败再走浮点数并截断小数部分。
pub fn parse_volume(raw: &str) -> Result<i64, FieldError> {
    let s = raw.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Ok(v);
    }
    let f = s
        .parse::<f64>()
        .map_err(|_| FieldError::InvalidInteger(s.to_string()))?;
    if !f.is_finite() {
        return Err(FieldError::InvalidInteger(s.to_string()));
    }
    let truncated = f.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(FieldError::InvalidInteger(s.to_string()));
    }
    Ok(truncated as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ts_code_is_trimmed() {
        assert_eq!(normalize_ts_code("  600000.SH ").unwrap(), "600000.SH");
        assert_eq!(normalize_ts_code("   "), Err(FieldError::EmptyCode));
        assert!(matches!(
            normalize_ts_code("ABCDEFGHIJKLMNOPQRSTU"),
            Err(FieldError::CodeTooLong(_))
        ));
    }

    #[test]
    fn test_trade_date_requires_compact_format() {
        assert_eq!(
            parse_trade_date(" 20240105 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert!(parse_trade_date("2024-01-05").is_err());
        assert!(parse_trade_date("20240230").is_err());
        assert!(parse_trade_date("2024015").is_err());
    }

    #[test]
    fn test_price_rounds_to_two_places() {
        assert_eq!(parse_price("10.345").unwrap().to_string(), "10.35");
        assert_eq!(parse_price(" 7 ").unwrap().to_string(), "7.00");
        assert_eq!(parse_price("-1.005").unwrap().to_string(), "-1.01");
        assert!(matches!(parse_price("abc"), Err(FieldError::InvalidDecimal(_))));
        assert!(matches!(parse_price(""), Err(FieldError::InvalidDecimal(_))));
    }

    #[test]
    fn test_price_outside_column_range() {
        assert!(parse_price("99999999.99").is_ok());
        assert!(matches!(
            parse_price("100000000"),
            Err(FieldError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_price("99999999.999"),
            Err(FieldError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_huge_exponent_is_rejected_without_expanding() {
        let started = std::time::Instant::now();
        assert!(matches!(
            parse_price("1e1000000000"),
            Err(FieldError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_price("-9.9E999999999"),
            Err(FieldError::OutOfRange(_))
        ));
        assert_eq!(parse_price("1e-1000000000").unwrap().to_string(), "0.00");
        assert_eq!(parse_price("0e1000000000").unwrap().to_string(), "0.00");
        assert!(started.elapsed() < std::time::Duration::from_secs(1));

        assert_eq!(parse_price("1.2345e3").unwrap().to_string(), "1234.50");
        assert_eq!(parse_price("5e-3").unwrap().to_string(), "0.01");
        assert_eq!(parse_price("4e-3").unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_volume_truncates_fractional_input() {
        assert_eq!(parse_volume("123456").unwrap(), 123456);
        assert_eq!(parse_volume("1234.9").unwrap(), 1234);
        assert_eq!(parse_volume("-3.7").unwrap(), -3);
        assert_eq!(parse_volume("1e3").unwrap(), 1000);
        assert_eq!(parse_volume("9223372036854775807").unwrap(), i64::MAX);
        assert!(parse_volume("NaN").is_err());
        assert!(parse_volume("inf").is_err());
        assert!(parse_volume("1e30").is_err());
        assert!(parse_volume("lots").is_err());
    }
}
