use std::path::{Path, PathBuf};

use crate::core::error::ConfigError;
use crate::delay::DelayBounds;
use crate::trace::TraceFormat;

/// Longest accepted state log file name, in bytes
pub const MAX_LOG_NAME: usize = 50;

/// 模拟配置 - 所有配置项
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | RESTAURANT_GROUPS | 3 | 客人组数量 |
/// | RESTAURANT_KEY | 0x1234 | 共享状态访问键 |
/// | RESTAURANT_LOG | log | 状态日志文件 |
/// | RESTAURANT_DIAGNOSTICS_DIR | . | 各角色诊断输出目录 |
/// | RESTAURANT_TRACE_FORMAT | text | 状态日志格式 (text / json) |
/// | RESTAURANT_SEED | - | 随机延迟种子 |
/// | RESTAURANT_MAX_ARRIVAL_MS | 500 | 到达延迟上限 |
/// | RESTAURANT_MAX_COOK_MS | 200 | 烹饪延迟上限 |
/// | RESTAURANT_MAX_EAT_MS | 400 | 用餐延迟上限 |
/// | LOG_LEVEL | info | tracing 日志级别 |
/// | LOG_DIR | - | tracing 日志目录 (不设置则输出到 stdout) |
#[derive(Debug, Clone)]
pub struct Config {
    /// 客人组数量
    pub n_groups: usize,
    /// 访问键 (原始文本，启动角色时再解析)
    pub key: String,
    /// 状态日志文件
    pub log: PathBuf,
    /// 诊断输出目录 (error_CH / error_WT / error_RT)
    pub diagnostics_dir: PathBuf,
    pub trace_format: TraceFormat,
    pub seed: Option<u64>,
    pub delays: DelayBounds,
    pub log_level: String,
    pub log_dir: Option<String>,
}

/// Reads one variable; unset falls back to `default`, unparsable is an error
fn var_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值；值无法解析时返回错误
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            n_groups: var_or(&lookup, "RESTAURANT_GROUPS", defaults.n_groups)?,
            key: lookup("RESTAURANT_KEY").unwrap_or(defaults.key),
            log: var_or(&lookup, "RESTAURANT_LOG", defaults.log)?,
            diagnostics_dir: var_or(&lookup, "RESTAURANT_DIAGNOSTICS_DIR", defaults.diagnostics_dir)?,
            trace_format: var_or(&lookup, "RESTAURANT_TRACE_FORMAT", defaults.trace_format)?,
            seed: match lookup("RESTAURANT_SEED") {
                None => None,
                Some(value) => Some(value.parse().map_err(|_| ConfigError::InvalidEnv {
                    name: "RESTAURANT_SEED",
                    value,
                })?),
            },
            delays: DelayBounds {
                max_arrival_ms: var_or(
                    &lookup,
                    "RESTAURANT_MAX_ARRIVAL_MS",
                    defaults.delays.max_arrival_ms,
                )?,
                max_cook_ms: var_or(&lookup, "RESTAURANT_MAX_COOK_MS", defaults.delays.max_cook_ms)?,
                max_eat_ms: var_or(&lookup, "RESTAURANT_MAX_EAT_MS", defaults.delays.max_eat_ms)?,
            },
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: lookup("LOG_DIR"),
        })
    }

    /// 测试用配置：指定目录下的日志和诊断文件
    pub fn for_dir(dir: &Path, n_groups: usize) -> Self {
        Self {
            n_groups,
            key: "0x1234".into(),
            log: dir.join("log"),
            diagnostics_dir: dir.to_path_buf(),
            trace_format: TraceFormat::Text,
            seed: Some(0),
            delays: DelayBounds {
                max_arrival_ms: 0,
                max_cook_ms: 0,
                max_eat_ms: 0,
            },
            log_level: "info".into(),
            log_dir: None,
        }
    }

    /// Launch parameters handed to one role
    pub fn launch_params(&self, diagnostics_name: &str) -> LaunchParams {
        LaunchParams {
            log: self.log.display().to_string(),
            key: self.key.clone(),
            diagnostics: self.diagnostics_dir.join(diagnostics_name),
        }
    }
}

impl Default for Config {
    /// Built-in defaults, no environment involved
    fn default() -> Self {
        Self {
            n_groups: 3,
            key: "0x1234".into(),
            log: PathBuf::from("log"),
            diagnostics_dir: PathBuf::from("."),
            trace_format: TraceFormat::Text,
            seed: None,
            delays: DelayBounds::default(),
            log_level: "info".into(),
            log_dir: None,
        }
    }
}

/// The three parameters every role is launched with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParams {
    /// State log file name
    pub log: String,
    /// Access key, as text
    pub key: String,
    /// Diagnostics output file
    pub diagnostics: PathBuf,
}

/// Launch parameters after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLaunch {
    pub log: PathBuf,
    pub key: u32,
    pub diagnostics: PathBuf,
}

impl LaunchParams {
    /// Checks the parameters without touching any shared resource
    pub fn validate(&self) -> Result<ValidatedLaunch, ConfigError> {
        if self.log.is_empty() {
            return Err(ConfigError::EmptyLogName);
        }
        // fixed 51-byte buffer on the C side, terminator included
        let len = self.log.len();
        if len > MAX_LOG_NAME {
            return Err(ConfigError::LogNameTooLong {
                len,
                max: MAX_LOG_NAME,
            });
        }
        Ok(ValidatedLaunch {
            log: PathBuf::from(&self.log),
            key: parse_key(&self.key)?,
            diagnostics: self.diagnostics.clone(),
        })
    }
}

/// Parses an access key with `strtol(.., 0)` rules: optional leading
/// whitespace and sign, then `0x`/`0X` hexadecimal, leading `0` octal or
/// decimal. Nothing may follow the digits.
///
/// A negative key wraps to its two's complement bit pattern, as the C `int`
/// key does. Values outside `i32::MIN..=u32::MAX` are rejected.
pub fn parse_key(text: &str) -> Result<u32, ConfigError> {
    let invalid = || ConfigError::InvalidKey(text.to_string());
    let trimmed = text.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (digits, radix) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (hex, 16)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (&unsigned[1..], 8)
    } else {
        (unsigned, 10)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }
    let magnitude = i64::from_str_radix(digits, radix).map_err(|_| invalid())?;
    let value = if negative { -magnitude } else { magnitude };
    if value < i64::from(i32::MIN) || value > i64::from(u32::MAX) {
        return Err(invalid());
    }
    Ok(value as u32)
}
