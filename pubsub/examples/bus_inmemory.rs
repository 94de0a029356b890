/// 内存总线示例
/// 展示“组件注册订阅 → 用户交互发布 → 组件退订”的闭环，
/// 以及单个订阅者失败被隔离后的聚合报告
use anyhow::Result as AnyResult;
use pubsub::{EventBus, InMemoryEventBus, Payload, Subscriber, Subscription};
use serde_json::json;
use std::sync::{Arc, Mutex};

// ============================================================================
// 支出列表组件（Subscriber）
// ============================================================================

#[derive(Default)]
struct ExpenseList {
    rows: Mutex<Vec<String>>,
}

impl Subscriber for ExpenseList {
    fn subscriber_name(&self) -> &str {
        "expense-list"
    }

    fn handle(&self, payload: &Payload) -> anyhow::Result<()> {
        let label = payload
            .get(0)
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("missing label"))?;
        let cents = payload
            .get(1)
            .and_then(|v| v.as_u64())
            .ok_or_else(|| anyhow::anyhow!("missing amount"))?;

        self.rows
            .lock()
            .unwrap()
            .push(format!("{label}: {}.{:02}", cents / 100, cents % 100));
        Ok(())
    }
}

// ============================================================================
// 组装与交互
// ============================================================================

fn main() -> AnyResult<()> {
    // 总线由组装层构造并显式传递，各组件之间互不引用
    let bus = Arc::new(InMemoryEventBus::new());
    let list = Arc::new(ExpenseList::default());

    let list_subscription: Subscription = bus.subscribe("expense-added", list.clone())?;

    // 闭包订阅者：对超出预算的单笔支出告警
    bus.subscribe_fn("expense-added", "budget-alert", |payload| {
        let cents = payload.get(1).and_then(|v| v.as_u64()).unwrap_or(0);
        if cents > 2000 {
            println!("[budget-alert] large expense: {cents} cents");
        }
        Ok(())
    })?;

    // 模拟用户交互：发布两笔支出
    bus.publish(
        "expense-added",
        Payload::new([json!("lunch"), json!(1250)]),
    )?;
    let report = bus.publish(
        "expense-added",
        Payload::new([json!("keyboard"), json!(8900)]),
    )?;
    println!(
        "delivered={} failures={}",
        report.delivered,
        report.failures.len()
    );

    // 载荷不符合约定时，失败被隔离并聚合在报告中，不影响其他订阅者
    let report = bus.publish("expense-added", Payload::from(json!("no amount")))?;
    for failure in &report.failures {
        println!("isolated failure: {failure}");
    }

    println!("rows: {:?}", list.rows.lock().unwrap());

    // 组件销毁：按凭据精确退订
    assert!(bus.unsubscribe(&list_subscription));
    bus.publish("expense-added", Payload::new([json!("tea"), json!(200)]))?;
    println!("rows after unsubscribe: {:?}", list.rows.lock().unwrap());

    Ok(())
}
