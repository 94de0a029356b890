//! 总线统一错误定义
//!
//! 聚焦事件名校验与订阅者失败两个最小必要集合，
//! 便于在各实现层统一转换为 `BusError`。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BusError {
    /// 事件名非法（空字符串等）
    #[error("invalid event name: {reason}")]
    InvalidEventName { reason: String },

    /// 单个订阅者处理失败（在发布侧被隔离并聚合，不作为 `publish` 的 Err 返回）
    #[error("subscriber error: subscriber={subscriber}, reason={reason}")]
    Subscriber { subscriber: String, reason: String },
}

/// 统一 Result 类型别名
pub type BusResult<T> = Result<T, BusError>;
