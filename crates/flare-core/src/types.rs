//! 基础类型契约，供上层模块直接复用，避免各处自行约定导致语义漂移。

use alloc::{string::String, sync::Arc};
use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{CoreError, Result, error::codes};

/// 非空字符串封装，约束标识符、头部键值等不被空白值污染。
///
/// # 设计背景（Why）
/// - “空字符串代表未配置”或 `"   "` 被当作有效标识，是评审中反复出现的隐性假设；
///   将非空约束前移，可以在构建期暴露错误。
/// - 统一采用 `Arc<str>` 语义，避免热点路径因多次克隆 `String` 产生额外复制。
///
/// # 契约说明（What）
/// - **输入参数**：[`NonEmptyStr::new`] 接受任意实现 `Into<Arc<str>>` 的值，
///   内部执行裁剪检查；若结果为空，返回 [`CoreError`]；
/// - **后置条件**：实例可安全克隆，克隆成本为一次 `Arc` 引用计数递增。
///
/// # 风险提示（Trade-offs）
/// - 不自动进行规范化（如小写化），避免引入不可逆变换；
/// - 序列化时输出原始字符串，反序列化会重新执行非空校验。
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyStr(Arc<str>);

impl NonEmptyStr {
    /// 构造受非空约束保护的字符串。
    pub fn new(value: impl Into<Arc<str>>) -> Result<Self> {
        let arc: Arc<str> = value.into();
        if arc.trim().is_empty() {
            return Err(CoreError::new(
                codes::APP_INVALID_ARGUMENT,
                "NonEmptyStr 要求输入不能为空或仅包含空白字符",
            ));
        }
        Ok(Self(arc))
    }

    /// 以 `&str` 视图访问底层数据，供日志或序列化使用。
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for NonEmptyStr {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NonEmptyStr {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NonEmptyStr::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_input() {
        // Why: 非空约束是本类型存在的全部意义，空白输入必须在构造期失败。
        assert!(NonEmptyStr::new("").is_err());
        assert!(NonEmptyStr::new("   ").is_err());
        let err = NonEmptyStr::new("\t\n").expect_err("blank must fail");
        assert_eq!(err.code(), codes::APP_INVALID_ARGUMENT);
    }

    #[test]
    fn serde_round_trip_revalidates() {
        // How: 序列化为裸字符串，反序列化经过同一条校验路径。
        let value = NonEmptyStr::new("marshal").expect("valid input");
        let json = serde_json::to_string(&value).expect("serialize");
        assert_eq!(json, "\"marshal\"");
        let back: NonEmptyStr = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, value);
        assert!(serde_json::from_str::<NonEmptyStr>("\"  \"").is_err());
    }
}
