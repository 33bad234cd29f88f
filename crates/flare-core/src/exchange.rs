//! 交换对象契约：路由管线中在途消息的统一容器。
//!
//! # 设计目标（Why）
//! - 让处理步骤、端点与路由引擎在讨论“一条消息”时共享同一种载体，
//!   避免各实现自行约定消息形态；
//! - 消息体刻意保持多形态（字节、文本、任意业务对象），使编解码器可以在
//!   “业务对象 ↔ 线上表示”之间自由转换，而容器本身保持不透明。
//!
//! # 使用方式（How）
//! - 处理步骤通过 [`Exchange::take_body`] 取走消息体、完成转换后用
//!   [`Exchange::set_body`] 放回；
//! - 头部键值通过 [`Exchange::with_header`] 附加，构造期即完成非空校验。

use alloc::{boxed::Box, string::String, vec::Vec};
use core::{any::Any, fmt, mem};

use crate::{Result, ids::ExchangeId, types::NonEmptyStr};

/// 消息体的多形态表示。
///
/// # 契约说明（What）
/// - `Empty`：尚无消息体，或消息体已被处理步骤取走；
/// - `Bytes`：线上表示，编解码器的典型输出；
/// - `Text`：UTF-8 文本表示，便于文本型协议与测试；
/// - `Value`：类型擦除的业务对象，由上下游按约定 `downcast`。
///
/// # 风险提示（Trade-offs）
/// - `Value` 的真实类型信息只存在于调用双方的约定中，取错类型会在
///   `downcast` 时暴露；
/// - 本枚举不承诺零拷贝，大消息体应在编解码器内部自行优化。
pub enum Body {
    /// 空消息体。
    Empty,
    /// 原始字节。
    Bytes(Vec<u8>),
    /// UTF-8 文本。
    Text(String),
    /// 类型擦除的业务对象。
    Value(Box<dyn Any + Send + Sync>),
}

impl Body {
    /// 是否为空消息体。
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    /// 以文本视图读取消息体；非 `Text` 变体返回 `None`。
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }

    /// 以字节视图读取消息体；非 `Bytes` 变体返回 `None`。
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Body::Empty"),
            Body::Bytes(bytes) => write!(f, "Body::Bytes(len={})", bytes.len()),
            Body::Text(text) => write!(f, "Body::Text(len={})", text.len()),
            Body::Value(_) => f.write_str("Body::Value(..)"),
        }
    }
}

/// 在途消息容器：标识 + 有序头部 + 消息体。
///
/// # 契约说明（What）
/// - `id`：全局唯一的交换标识，由进入管线的一侧分配；
/// - `headers`：有序键值对，键值均满足非空约束，迭代顺序与插入顺序一致；
/// - `body`：当前消息体，处理步骤可取走并替换。
///
/// # 风险提示（Trade-offs）
/// - 头部重复键不做合并，保持输入顺序，交由更高层按需处理；
/// - 容器自身不做并发防护，单个交换对象同一时刻只应由一个处理步骤持有。
#[derive(Debug)]
pub struct Exchange {
    id: ExchangeId,
    headers: Vec<(NonEmptyStr, NonEmptyStr)>,
    body: Body,
}

impl Exchange {
    /// 构造交换对象。
    pub fn new(id: ExchangeId, body: Body) -> Self {
        Self {
            id,
            headers: Vec::new(),
            body,
        }
    }

    /// 附加一个头部键值对，构造期完成非空校验。
    pub fn with_header(
        mut self,
        key: impl Into<alloc::sync::Arc<str>>,
        value: impl Into<alloc::sync::Arc<str>>,
    ) -> Result<Self> {
        self.headers
            .push((NonEmptyStr::new(key)?, NonEmptyStr::new(value)?));
        Ok(self)
    }

    /// 交换标识。
    pub fn id(&self) -> &ExchangeId {
        &self.id
    }

    /// 头部键值对集合。
    pub fn headers(&self) -> &[(NonEmptyStr, NonEmptyStr)] {
        &self.headers
    }

    /// 读取当前消息体。
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// 可变访问消息体。
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// 替换消息体。
    pub fn set_body(&mut self, body: Body) {
        self.body = body;
    }

    /// 取走消息体，原位置留下 [`Body::Empty`]。
    pub fn take_body(&mut self) -> Body {
        mem::replace(&mut self.body, Body::Empty)
    }
}
