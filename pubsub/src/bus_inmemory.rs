//! 内存版事件总线（InMemoryEventBus）
//!
//! 基于 `DashMap` 注册表的轻量实现，满足 `EventBus` 协议：
//! - `subscribe`：按事件名惰性建表并追加，保持注册顺序；
//! - `publish`：先拷出当前订阅者快照，再在调用线程上按顺序同步触达，
//!   单个订阅者的失败被隔离并聚合到 `PublishReport`；
//! - `unsubscribe`：按凭据 id 精确移除对应的那一次注册；
//! - 典型用途：进程内组件解耦、测试环境与本地开发。
//!
//! 注意：投递无排队与延迟，发布期间新增的订阅不会被本次发布触达。

use crate::bus::{EventBus, PublishReport, Subscription};
use crate::error::{BusError, BusResult};
use crate::event::{EventName, Payload};
use crate::subscriber::{FnSubscriber, Subscriber};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

struct Registration {
    id: Uuid,
    subscriber: Arc<dyn Subscriber>,
}

/// 简单的内存事件总线实现
///
/// 注册表归总线实例独占所有；应用侧应显式构造并传递实例（依赖注入），
/// 而非依赖全局单例。
#[derive(Default)]
pub struct InMemoryEventBus {
    registry: DashMap<EventName, Vec<Registration>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以闭包形式注册订阅者的便捷方法
    pub fn subscribe_fn<F>(&self, event: &str, name: &str, f: F) -> BusResult<Subscription>
    where
        F: Fn(&Payload) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.subscribe(event, Arc::new(FnSubscriber::new(name, f)))
    }

    /// 某事件名当前的注册数（重复注册按次数计）
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.registry.get(event).map(|list| list.len()).unwrap_or(0)
    }
}

impl EventBus for InMemoryEventBus {
    fn subscribe(&self, event: &str, subscriber: Arc<dyn Subscriber>) -> BusResult<Subscription> {
        let event = EventName::parse(event)?;
        let subscription = Subscription::new(event.clone());

        self.registry.entry(event).or_default().push(Registration {
            id: subscription.id(),
            subscriber,
        });

        Ok(subscription)
    }

    fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let Some(mut list) = self.registry.get_mut(subscription.event()) else {
            return false;
        };

        let before = list.len();
        list.retain(|r| r.id != subscription.id());
        list.len() != before
    }

    fn publish(&self, event: &str, payload: Payload) -> BusResult<PublishReport> {
        let event = EventName::parse(event)?;

        // 先拷出快照再调用：触达期间不持有注册表锁，
        // 订阅者在回调中再次 subscribe/publish 不会与分发互相阻塞
        let snapshot: Vec<Arc<dyn Subscriber>> = match self.registry.get(&event) {
            Some(list) => list.iter().map(|r| r.subscriber.clone()).collect(),
            // 无订阅者：安静的空操作
            None => return Ok(PublishReport::default()),
        };

        let mut report = PublishReport::default();
        for subscriber in snapshot {
            match subscriber.handle(&payload) {
                Ok(()) => report.delivered += 1,
                Err(err) => report.failures.push(BusError::Subscriber {
                    subscriber: subscriber.subscriber_name().to_string(),
                    reason: err.to_string(),
                }),
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use std::thread;

    /// 记录触达顺序与载荷的侦测订阅者
    struct SpySubscriber {
        name: &'static str,
        log: Arc<Mutex<Vec<(String, Vec<serde_json::Value>)>>>,
    }

    impl SpySubscriber {
        fn new(
            name: &'static str,
            log: Arc<Mutex<Vec<(String, Vec<serde_json::Value>)>>>,
        ) -> Arc<Self> {
            Arc::new(Self { name, log })
        }
    }

    impl Subscriber for SpySubscriber {
        fn subscriber_name(&self) -> &str {
            self.name
        }

        fn handle(&self, payload: &Payload) -> anyhow::Result<()> {
            self.log
                .lock()
                .unwrap()
                .push((self.name.to_string(), payload.iter().cloned().collect()));
            Ok(())
        }
    }

    #[test]
    fn delivers_in_registration_order_with_same_arguments() {
        let bus = InMemoryEventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe("tick", SpySubscriber::new("f", log.clone()))
            .unwrap();
        bus.subscribe("tick", SpySubscriber::new("g", log.clone()))
            .unwrap();

        let report = bus
            .publish("tick", Payload::new([json!(1), json!(2)]))
            .unwrap();

        assert_eq!(report.delivered, 2);
        assert!(report.all_delivered());
        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![
                ("f".to_string(), vec![json!(1), json!(2)]),
                ("g".to_string(), vec![json!(1), json!(2)]),
            ]
        );
    }

    #[test]
    fn publish_without_subscribers_is_silent_noop() {
        let bus = InMemoryEventBus::new();
        let report = bus.publish("nobody-listens", Payload::empty()).unwrap();

        assert_eq!(report.delivered, 0);
        assert!(report.all_delivered());
    }

    #[test]
    fn payload_reaches_subscriber_unmodified() {
        let bus = InMemoryEventBus::new();
        let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let log_hunger = log.clone();
        bus.subscribe_fn("gets-hungry", "log-hunger", move |payload| {
            let who = payload
                .get(0)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            log_hunger.lock().unwrap().push(who);
            Ok(())
        })
        .unwrap();

        bus.publish("gets-hungry", Payload::from(json!("stomach")))
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["stomach".to_string()]);
    }

    #[test]
    fn duplicate_registration_is_delivered_twice() {
        let bus = InMemoryEventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let subscriber = SpySubscriber::new("dup", log.clone());

        bus.subscribe("tick", subscriber.clone()).unwrap();
        bus.subscribe("tick", subscriber).unwrap();

        let report = bus.publish("tick", Payload::empty()).unwrap();

        assert_eq!(report.delivered, 2);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn other_event_names_are_not_invoked() {
        let bus = InMemoryEventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe("a", SpySubscriber::new("a-only", log.clone()))
            .unwrap();
        bus.publish("b", Payload::empty()).unwrap();

        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn failing_subscriber_does_not_block_later_ones() {
        let bus = InMemoryEventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe_fn("tick", "bad", |_| Err(anyhow::anyhow!("boom")))
            .unwrap();
        bus.subscribe("tick", SpySubscriber::new("good", log.clone()))
            .unwrap();

        let report = bus.publish("tick", Payload::empty()).unwrap();

        assert_eq!(report.delivered, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(!report.all_delivered());
        match &report.failures[0] {
            BusError::Subscriber { subscriber, reason } => {
                assert_eq!(subscriber, "bad");
                assert_eq!(reason, "boom");
            }
            other => panic!("unexpected failure: {other:?}"),
        }
        // 失败订阅者之后注册的订阅者仍被触达
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_registration() {
        let bus = InMemoryEventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let subscriber = SpySubscriber::new("dup", log.clone());

        let first = bus.subscribe("tick", subscriber.clone()).unwrap();
        bus.subscribe("tick", subscriber).unwrap();
        assert_eq!(bus.subscriber_count("tick"), 2);

        assert!(bus.unsubscribe(&first));
        assert_eq!(bus.subscriber_count("tick"), 1);

        let report = bus.publish("tick", Payload::empty()).unwrap();
        assert_eq!(report.delivered, 1);
    }

    #[test]
    fn stale_subscription_returns_false() {
        let bus = InMemoryEventBus::new();
        let subscription = bus.subscribe_fn("tick", "once", |_| Ok(())).unwrap();

        assert!(bus.unsubscribe(&subscription));
        assert!(!bus.unsubscribe(&subscription));
    }

    #[test]
    fn empty_event_name_is_rejected_on_both_operations() {
        let bus = InMemoryEventBus::new();

        let err = bus.subscribe_fn("", "noop", |_| Ok(())).unwrap_err();
        assert!(matches!(err, BusError::InvalidEventName { .. }));

        let err = bus.publish("", Payload::empty()).unwrap_err();
        assert!(matches!(err, BusError::InvalidEventName { .. }));
    }

    #[test]
    fn reentrant_subscribe_does_not_deadlock_or_join_in_flight_publish() {
        let bus = Arc::new(InMemoryEventBus::new());
        let late_log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let bus_in_handler = bus.clone();
        let late_log_in_handler = late_log.clone();
        bus.subscribe_fn("tick", "registrar", move |_| {
            let late_log = late_log_in_handler.clone();
            bus_in_handler.subscribe_fn("tick", "late", move |_| {
                late_log.lock().unwrap().push("late".to_string());
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

        let report = bus.publish("tick", Payload::empty()).unwrap();

        // 回调内新增的订阅不参与本次发布
        assert_eq!(report.delivered, 1);
        assert!(late_log.lock().unwrap().is_empty());

        // 下一次发布时两个订阅者都会被触达
        let report = bus.publish("tick", Payload::empty()).unwrap();
        assert_eq!(report.delivered, 2);
        assert_eq!(*late_log.lock().unwrap(), vec!["late".to_string()]);
    }

    #[test]
    fn publish_from_multiple_threads_is_safe() {
        let bus = Arc::new(InMemoryEventBus::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe("tick", SpySubscriber::new("counter", log.clone()))
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let bus = bus.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    bus.publish("tick", Payload::empty()).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(log.lock().unwrap().len(), 400);
    }
}
