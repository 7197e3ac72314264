use std::path::PathBuf;

use chrono_tz::Tz;

use crate::utils::{AppError, AppResult};

/// 服务配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/crab/booking | 工作目录（数据库、日志） |
/// | RESTAURANT_ID | default | 餐厅标识 |
/// | TIMEZONE | Europe/Madrid | 餐厅所在时区 (IANA) |
/// | LOG_LEVEL | info | 日志级别（`RUST_LOG` 优先） |
/// | LOG_DIR | 无 | 设置后日志按天滚动写入该目录 |
/// | SETTINGS_FILE | 无 | 首次启动时导入的设置 JSON |
/// | NOTIFY_BUFFER | 256 | 通知通道容量 |
/// | HISTORY_BUFFER | 1024 | 历史通道容量 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/booking TIMEZONE=America/New_York cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    pub restaurant_id: String,
    /// 时区名称，启动时由 [`Config::timezone`] 校验
    pub timezone: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub settings_file: Option<String>,
    pub notify_buffer: usize,
    pub history_buffer: usize,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/crab/booking".into()),
            restaurant_id: std::env::var("RESTAURANT_ID").unwrap_or_else(|_| "default".into()),
            timezone: std::env::var("TIMEZONE").unwrap_or_else(|_| "Europe/Madrid".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            settings_file: std::env::var("SETTINGS_FILE").ok().filter(|s| !s.is_empty()),
            notify_buffer: std::env::var("NOTIFY_BUFFER")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(256),
            history_buffer: std::env::var("HISTORY_BUFFER")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(1024),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义工作目录
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// 解析时区
    pub fn timezone(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::validation(format!("Unknown timezone: {}", self.timezone)))
    }

    /// 确保工作目录存在
    pub fn ensure_work_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        if let Some(dir) = &self.log_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// 数据库文件路径: work_dir/booking.redb
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("booking.redb")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timezone_parsing() {
        let mut config = Config::with_work_dir("/tmp/booking");
        config.timezone = "America/New_York".into();
        assert_eq!(config.timezone().unwrap(), chrono_tz::America::New_York);

        config.timezone = "Mars/Olympus".into();
        assert!(config.timezone().is_err());
    }

    #[test]
    fn test_database_path_under_work_dir() {
        let config = Config::with_work_dir("/data/booking");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/data/booking/booking.redb")
        );
    }
}
