use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// 日志输出配置（LOG_TO_FILE / LOG_DIR）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// 为 true 时额外写入按天轮转的日志文件
    pub to_file: bool,
    pub dir: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            to_file: false,
            dir: PathBuf::from("./logs"),
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("LOG_TO_FILE").ok().as_deref(),
            std::env::var("LOG_DIR").ok().as_deref(),
        )
    }

    fn from_vars(to_file: Option<&str>, dir: Option<&str>) -> Self {
        let default = Self::default();
        Self {
            to_file: to_file.map(parse_flag).unwrap_or(default.to_file),
            dir: dir
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(PathBuf::from)
                .unwrap_or(default.dir),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub database_url: String,
    pub db_pool_size: u32,
    /// 上传文件存放根目录，论文 PDF 存在 `<media_root>/papers/` 下
    pub media_root: PathBuf,
    pub max_upload_bytes: usize,
    pub run_migrations: bool,
    pub log: LogConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8001);
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("Invalid HOST/PORT: {}:{}", host, port))?;

        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL not set")?;
        let db_pool_size = std::env::var("DB_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(10);
        let media_root = std::env::var("MEDIA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./media"));
        let max_upload_bytes = std::env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        let run_migrations = std::env::var("RUN_MIGRATIONS")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Ok(Self {
            addr,
            database_url,
            db_pool_size,
            media_root,
            max_upload_bytes,
            run_migrations,
            log: LogConfig::from_env(),
        })
    }

    /// 测试用配置，不读环境变量
    pub fn for_media_root(media_root: impl Into<PathBuf>) -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8001)),
            database_url: String::new(),
            db_pool_size: 1,
            media_root: media_root.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            run_migrations: false,
            log: LogConfig::default(),
        }
    }
}

pub fn parse_flag(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
