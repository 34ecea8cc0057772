use std::path::PathBuf;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    EarningRepository, OrderRepository, SuborderRepository, WithdrawalRepository,
};
use crate::earnings::{BalanceService, RecognitionService, SweepTask};
use crate::referrals::ReferralService;
use crate::settlement::SettlementService;
use crate::withdrawals::WithdrawalEngine;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 所有字段都是廉价克隆（内部为 `Surreal<Db>` 句柄），
/// 直接作为 axum 的 `State` 使用。
///
/// # 服务组件
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 |
/// | orders / suborders / earnings / withdrawals | 仓储层 |
/// | recognition | 收益确认引擎 |
/// | balance | 余额聚合 |
/// | engine | 提现工作流引擎 |
/// | referrals | 推荐奖励 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    pub orders: OrderRepository,
    pub suborders: SuborderRepository,
    pub earnings: EarningRepository,
    pub withdrawals: WithdrawalRepository,
    pub settlement: SettlementService,
    pub recognition: RecognitionService,
    pub balance: BalanceService,
    pub engine: WithdrawalEngine,
    pub referrals: ReferralService,
}

impl ServerState {
    fn build(config: Config, db: Surreal<Db>) -> Self {
        let orders = OrderRepository::new(db.clone());
        let suborders = SuborderRepository::new(db.clone());
        let earnings = EarningRepository::new(db.clone());
        let withdrawals = WithdrawalRepository::new(db.clone());

        let settlement = SettlementService::new(orders.clone(), config.clone());
        let recognition =
            RecognitionService::new(suborders.clone(), earnings.clone(), config.clone());
        let balance = BalanceService::new(earnings.clone(), withdrawals.clone());
        let engine = WithdrawalEngine::new(withdrawals.clone(), config.clone());
        let referrals = ReferralService::new(earnings.clone(), config.clone());

        Self {
            config,
            db,
            orders,
            suborders,
            earnings,
            withdrawals,
            settlement,
            recognition,
            balance,
            engine,
            referrals,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/ledger.db)
    /// 3. 仓储与领域服务
    ///
    /// # Panics
    ///
    /// 工作目录或数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        let db_dir = PathBuf::from(&config.work_dir).join("database");
        std::fs::create_dir_all(&db_dir).expect("Failed to create work directory structure");

        let db_path = db_dir.join("ledger.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::build(config.clone(), db_service.db)
    }

    /// 内存数据库状态 (测试和临时运行)
    pub async fn memory(config: Config) -> Result<Self, crate::utils::AppError> {
        let db_service = DbService::memory().await?;
        Ok(Self::build(config, db_service.db))
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 锁定期成熟扫描 (sweep_interval_secs > 0 时)
    pub async fn start_background_tasks(&self) {
        if self.config.sweep_interval_secs > 0 {
            SweepTask::new(self.earnings.clone(), self.config.sweep_interval_secs).spawn();
        }
    }
}
