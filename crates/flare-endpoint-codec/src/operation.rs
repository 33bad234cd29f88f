//! 操作方向：端点在整个生命周期内固定执行的那一种转换。

use alloc::borrow::ToOwned;
use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::EndpointConfigError;

/// 端点的操作方向，配置期选定、启动后不可变。
///
/// # 设计背景（Why）
/// - 方向是封闭的二选一；用枚举而非字符串承载，使“配置了未知方向”在
///   解析阶段即被拒绝，运行期不存在兜底分支；
/// - 序列化形态固定为小写字符串（`"marshal"` / `"unmarshal"`），与配置层
///   的书写习惯一致。
///
/// # 契约说明（What）
/// - [`FromStr`] 只接受上述两个字面值，其余输入（包括大小写变体）返回
///   [`EndpointConfigError::UnknownOperation`]；
/// - 每个端点实例在其整个生命周期内只持有一个方向。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// 编码方向：业务表示 → 线上表示。
    Marshal,
    /// 解码方向：线上表示 → 业务表示。
    Unmarshal,
}

impl Operation {
    /// 配置层使用的小写字面值。
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Marshal => "marshal",
            Operation::Unmarshal => "unmarshal",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = EndpointConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "marshal" => Ok(Operation::Marshal),
            "unmarshal" => Ok(Operation::Unmarshal),
            other => Err(EndpointConfigError::UnknownOperation(other.to_owned())),
        }
    }
}
