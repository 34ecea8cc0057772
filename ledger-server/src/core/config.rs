/// 服务器配置 - 账本服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/soko/ledger | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | COMMISSION_RATE_PERCENT | 15 | 平台佣金率 (%) |
/// | IMMEDIATE_RELEASE_PERCENT | 80 | 收益立即释放比例 (%) |
/// | HOLD_DURATION_HOURS | 24 | 锁定期时长 (小时) |
/// | MIN_WITHDRAWAL_AMOUNT | 100 | 最低提现金额 |
/// | REFERRAL_RATE_PERCENT | 20 | 推荐奖励率 (%) |
/// | SWEEP_INTERVAL_SECS | 300 | 锁定期成熟扫描间隔 (秒，0 = 关闭) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/soko HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 账本业务配置 ===
    /// 平台佣金率 (百分比)
    pub commission_rate_percent: f64,
    /// 收益确认时立即可提现的比例 (百分比)
    pub immediate_release_percent: f64,
    /// 剩余部分的锁定时长 (小时)
    pub hold_duration_hours: i64,
    /// 单次提现最低金额
    pub min_withdrawal_amount: f64,
    /// 推荐奖励率 (被推荐供应商订阅付款的百分比)
    pub referral_rate_percent: f64,
    /// 后台锁定期成熟扫描间隔 (秒)，0 表示关闭
    pub sweep_interval_secs: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/soko/ledger".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            commission_rate_percent: std::env::var("COMMISSION_RATE_PERCENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15.0),
            immediate_release_percent: std::env::var("IMMEDIATE_RELEASE_PERCENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(80.0),
            hold_duration_hours: std::env::var("HOLD_DURATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            min_withdrawal_amount: std::env::var("MIN_WITHDRAWAL_AMOUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100.0),
            referral_rate_percent: std::env::var("REFERRAL_RATE_PERCENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20.0),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 锁定期时长 (毫秒)
    pub fn hold_duration_millis(&self) -> i64 {
        self.hold_duration_hours * 60 * 60 * 1000
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
