//! 进程内发布-订阅基础库（pubsub）
//!
//! 以事件名解耦生产者与消费者的最小构件集：
//! - 事件名与载荷（`event`）：非空校验与不透明透传
//! - 订阅者（`subscriber`）：处理协议与闭包适配器
//! - 总线协议（`bus`）：订阅/发布/退订的统一抽象
//! - 内存实现（`bus_inmemory`）：基于注册表的同步分发
//!
//! 本 crate 不绑定任何传输或运行时：发布在调用线程上同步完成，
//! 按注册顺序依次触达订阅者；单个订阅者的失败被隔离并聚合返回，
//! 不影响其余订阅者的投递。
//!
//! 典型用法：
//! 1. 组装层显式构造 `InMemoryEventBus` 并传递给各组件（依赖注入，而非全局单例）；
//! 2. 组件初始化时 `subscribe` 关心的事件名，保存返回的 `Subscription` 凭据；
//! 3. 交互发生时 `publish` 事件名与载荷，按需检查 `PublishReport`；
//! 4. 组件销毁时用凭据 `unsubscribe` 精确退订。
//!
//! ```
//! use pubsub::{EventBus, InMemoryEventBus, Payload};
//! use serde_json::json;
//!
//! let bus = InMemoryEventBus::new();
//! let subscription = bus
//!     .subscribe_fn("gets-hungry", "mouth", |payload| {
//!         println!("feeding: {:?}", payload.get(0));
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let report = bus.publish("gets-hungry", Payload::from(json!("stomach"))).unwrap();
//! assert_eq!(report.delivered, 1);
//!
//! assert!(bus.unsubscribe(&subscription));
//! ```
//!
pub mod bus;
pub mod bus_inmemory;
pub mod error;
pub mod event;
pub mod subscriber;

pub use bus::{EventBus, PublishReport, Subscription};
pub use bus_inmemory::InMemoryEventBus;
pub use error::{BusError, BusResult};
pub use event::{EventName, Payload};
pub use subscriber::{FnSubscriber, Subscriber};
