use chrono::Utc;
use chrono_tz::Asia::Shanghai;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::utils::config::LogConfig;

const LOG_FILE_PREFIX: &str = "financial-data-mining.log";
const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info";

/// 日志时间统一使用 UTC+8 (上海时区)
struct ShanghaiTime;

impl FormatTime for ShanghaiTime {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Utc::now().with_timezone(&Shanghai);
        write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// 控制台始终输出；`cfg.to_file` 时再挂一个按天轮转的文件层
pub fn init_logging(cfg: &LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer()
        .with_timer(ShanghaiTime)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    let file_layer = cfg.to_file.then(|| {
        let appender = RollingFileAppender::new(Rotation::DAILY, &cfg.dir, LOG_FILE_PREFIX);
        fmt::layer()
            .with_timer(ShanghaiTime)
            .with_writer(appender)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if cfg.to_file {
        tracing::info!("Writing logs to {}", cfg.dir.display());
    }
}
