//! 标识符契约，规范跨组件的 ID 校验逻辑。
//!
//! # 设计动机（Why）
//! - 消除“字符串即 ID”造成的隐式耦合，通过受约束的新类型表达交换标识；
//! - 与 [`crate::types::NonEmptyStr`] 搭配，保证 ID 不会退化为空或纯空白字符串。

use alloc::sync::Arc;
use core::fmt;

use crate::{Result, types::NonEmptyStr};

/// 交换标识，贯穿路由管线，用于追踪单个在途消息的生命周期。
///
/// # 契约定义（What）
/// - **输入参数**：`value` 必须是非空字符串，建议采用 UUID 或 `<来源>:<序号>` 形式；
/// - **前置条件**：调用方已经确保 ID 唯一性，本类型仅负责结构校验；
/// - **后置条件**：构造成功后，可通过 [`ExchangeId::as_str`] 以零拷贝方式读取。
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExchangeId(NonEmptyStr);

impl ExchangeId {
    /// 从原始字符串解析交换标识。
    pub fn parse(value: impl Into<Arc<str>>) -> Result<Self> {
        Ok(Self(NonEmptyStr::new(value)?))
    }

    /// 返回底层字符串切片。
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
