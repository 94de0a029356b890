//! 事件总线（EventBus）协议
//!
//! 定义“订阅 → 发布 → 退订”的统一抽象：
//! - 发布为同步调用，按注册顺序依次触达当前订阅者；
//! - 单个订阅者的失败被隔离并聚合在 `PublishReport` 中，不中断后续投递；
//! - `subscribe` 返回 `Subscription` 凭据，退订时按凭据精确移除，
//!   不依赖回调本身可比较。
//!
//! 该模块仅定义协议，不绑定具体实现；进程内场景见 `bus_inmemory`。
//!
use crate::error::{BusError, BusResult};
use crate::event::{EventName, Payload};
use crate::subscriber::Subscriber;
use std::sync::Arc;
use uuid::Uuid;

/// 订阅凭据：标识一次具体的订阅
///
/// 同一订阅者重复注册会得到不同凭据，退订只移除凭据对应的那一次注册。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: Uuid,
    event: EventName,
}

impl Subscription {
    pub(crate) fn new(event: EventName) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 该订阅所属的事件名
    pub fn event(&self) -> &EventName {
        &self.event
    }
}

/// 单次发布的投递结果
///
/// `publish` 本身只在事件名非法时返回 Err；
/// 订阅者的失败记录在 `failures` 中，由调用方按需处理。
#[derive(Debug, Default)]
pub struct PublishReport {
    /// 成功触达的订阅者数量
    pub delivered: usize,
    /// 被隔离的订阅者失败（`BusError::Subscriber`）
    pub failures: Vec<BusError>,
}

impl PublishReport {
    /// 是否全部订阅者均成功触达（无订阅者时也为 true）
    pub fn all_delivered(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 事件总线：负责注册订阅与同步分发事件
pub trait EventBus: Send + Sync {
    /// 注册订阅者，返回可用于退订的凭据
    ///
    /// 事件名首次被订阅时惰性建表；同一订阅者可重复注册（发布时重复触达）。
    fn subscribe(&self, event: &str, subscriber: Arc<dyn Subscriber>) -> BusResult<Subscription>;

    /// 将同一订阅者注册到多个事件名，返回每个事件名对应的凭据
    fn subscribe_many(
        &self,
        events: &[&str],
        subscriber: Arc<dyn Subscriber>,
    ) -> BusResult<Vec<Subscription>> {
        let mut subscriptions = Vec::with_capacity(events.len());
        for event in events {
            subscriptions.push(self.subscribe(event, subscriber.clone())?);
        }
        Ok(subscriptions)
    }

    /// 按凭据移除对应的那一次注册；凭据已失效时返回 false
    fn unsubscribe(&self, subscription: &Subscription) -> bool;

    /// 同步发布事件：在调用线程上按注册顺序依次触达所有订阅者
    ///
    /// 无订阅者时为安静的空操作（返回空报告），发布永远不因无人监听而出错。
    fn publish(&self, event: &str, payload: Payload) -> BusResult<PublishReport>;

    /// 依次发布一批事件（每个事件名配一份载荷）
    fn publish_batch(&self, events: &[(&str, Payload)]) -> BusResult<Vec<PublishReport>> {
        let mut reports = Vec::with_capacity(events.len());
        for (event, payload) in events {
            reports.push(self.publish(event, payload.clone())?);
        }
        Ok(reports)
    }
}
