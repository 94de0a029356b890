//! 订阅者（Subscriber）
//!
//! 定义消费事件载荷的处理逻辑与元信息（名称），
//! 并提供以闭包形式注册的轻量适配器。
//!
use crate::event::Payload;

/// 订阅者：处理某个事件名下发布的载荷
pub trait Subscriber: Send + Sync {
    /// 订阅者名称（用于失败报告与审计）
    fn subscriber_name(&self) -> &str;
    /// 处理一次发布的载荷
    fn handle(&self, payload: &Payload) -> anyhow::Result<()>;
}

/// 闭包适配器：将普通函数/闭包包装为 `Subscriber`
pub struct FnSubscriber<F> {
    name: String,
    f: F,
}

impl<F> FnSubscriber<F>
where
    F: Fn(&Payload) -> anyhow::Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Subscriber for FnSubscriber<F>
where
    F: Fn(&Payload) -> anyhow::Result<()> + Send + Sync,
{
    fn subscriber_name(&self) -> &str {
        &self.name
    }

    fn handle(&self, payload: &Payload) -> anyhow::Result<()> {
        (self.f)(payload)
    }
}
