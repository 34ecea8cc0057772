//! Soko Ledger Server - 多供应商市场的收益账本与提现工作流
//!
//! # 架构概述
//!
//! 本模块是账本服务的主入口，提供以下核心功能：
//!
//! - **拆单结算** (`settlement`): 多供应商订单拆分与佣金计算
//! - **收益账本** (`earnings`): 80/20 分期收益确认、余额聚合、锁定期成熟
//! - **提现工作流** (`withdrawals`): PENDING → APPROVED → PROCESSED 状态机
//! - **推荐奖励** (`referrals`): 订阅付款的推荐分成
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! ledger-server/src/
//! ├── core/          # 配置、状态、错误
//! ├── api/           # HTTP 路由和处理器
//! ├── settlement/    # 拆单与货币计算
//! ├── earnings/      # 收益确认、余额、成熟扫描
//! ├── withdrawals/   # 提现工作流引擎
//! ├── referrals/     # 推荐奖励
//! ├── db/            # 数据库层 (模型 + 仓储)
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod earnings;
pub mod referrals;
pub mod settlement;
pub mod utils;
pub mod withdrawals;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use earnings::{BalanceService, RecognitionService};
pub use referrals::ReferralService;
pub use settlement::SettlementService;
pub use utils::{AppError, AppResponse, AppResult};
pub use withdrawals::WithdrawalEngine;

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____       __
  / ___/____  / /______
  \__ \/ __ \/ //_/ __ \
 ___/ / /_/ / ,< / /_/ /
/____/\____/_/|_|\____/
    __              __
   / /   ___  ____/ /___ ____  _____
  / /   / _ \/ __  / __ `/ _ \/ ___/
 / /___/  __/ /_/ / /_/ /  __/ /
/_____/\___/\__,_/\__, /\___/_/
                 /____/
    "#
    );
}
