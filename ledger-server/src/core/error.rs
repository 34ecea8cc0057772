use thiserror::Error;

/// 服务器启动/运行层错误 (业务错误见 `utils::AppError`)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("网络错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 服务器层 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
