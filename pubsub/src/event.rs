//! 事件名与载荷（EventName / Payload）
//!
//! - `EventName`：非空字符串的事件名值对象，订阅与发布共用同一校验，
//!   无需预先枚举或注册即可使用任意名字；
//! - `Payload`：按位置排列的一组不透明 JSON 值，总线只负责原样透传，
//!   不检查也不约束其结构。
//!
use crate::error::{BusError, BusResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// 事件名：任意非空字符串
///
/// # 示例
///
/// ```
/// use pubsub::event::EventName;
///
/// let name = EventName::parse("gets-hungry").unwrap();
/// assert_eq!(name.as_str(), "gets-hungry");
///
/// assert!(EventName::parse("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventName(String);

impl EventName {
    /// 校验并创建事件名（空字符串视为非法）
    pub fn parse(name: impl Into<String>) -> BusResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(BusError::InvalidEventName {
                reason: "event name must be a non-empty string".to_string(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// 允许以 &str 直接查询以 EventName 为键的表（哈希与相等性同 String 一致）
impl std::borrow::Borrow<str> for EventName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for EventName {
    type Error = BusError;

    fn try_from(value: &str) -> BusResult<Self> {
        Self::parse(value)
    }
}

impl TryFrom<String> for EventName {
    type Error = BusError;

    fn try_from(value: String) -> BusResult<Self> {
        Self::parse(value)
    }
}

/// 事件载荷：发布时原样传递给每个订阅者的一组位置参数
///
/// 内部以 `Arc<[Value]>` 存放，克隆代价为一次引用计数，
/// 适合同一份载荷按顺序触达多个订阅者的场景。
#[derive(Debug, Clone)]
pub struct Payload(Arc<[Value]>);

impl Payload {
    /// 空载荷（零个参数）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从一组 JSON 值创建载荷
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self(values.into_iter().collect())
    }

    /// 取第 `index` 个位置参数
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// 以切片视图访问全部位置参数
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self(Vec::new().into())
    }
}

impl From<Vec<Value>> for Payload {
    fn from(values: Vec<Value>) -> Self {
        Self(values.into())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::new([value])
    }
}

impl FromIterator<Value> for Payload {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a Payload {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
