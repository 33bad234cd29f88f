//! 编解码能力契约：把“某种数据格式存在”表达为路由框架可消费的对象层接口。

use alloc::borrow::Cow;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    CoreError, Result, exchange::Body, future::BoxFuture, sealed::Sealed, service::Service,
};

/// 数据格式的内容类型标注，例如 `text/plain; charset=utf-8`。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType(Cow<'static, str>);

impl ContentType {
    /// 构造内容类型；静态字面量零分配。
    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Self(value.into())
    }

    /// 以 `&str` 视图读取。
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 数据格式描述符：名称与内容类型的稳定快照。
///
/// # 设计背景（Why）
/// - 端点与诊断面需要一个可序列化的身份标签来引用某个编解码实现，
///   而无需理解其内部算法；
/// - 配置层可直接携带该描述符，与运行期实例解耦。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFormatDescriptor {
    name: Cow<'static, str>,
    content_type: ContentType,
}

impl DataFormatDescriptor {
    /// 构造描述符。
    pub fn new(name: impl Into<Cow<'static, str>>, content_type: ContentType) -> Self {
        Self {
            name: name.into(),
            content_type,
        }
    }

    /// 数据格式名称，建议使用 `<领域>-<格式>` 形式。
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 内容类型标注。
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }
}

/// 延迟完成的转换结果。
pub type TransformFuture = BoxFuture<'static, Result<Body, CoreError>>;

/// 单次转换调用的完成形态。
///
/// # 设计目标（Why）
/// - 把“当场完成”与“稍后完成”表达为类型可区分的两个分支，调用方无需依赖
///   布尔值加旁路回调的隐式约定；
/// - 同步实现零开销返回 `Completed`，异步实现通过 `Deferred` 携带续体。
///
/// # 契约说明（What）
/// - `Completed`：转换已结束，携带新消息体；
/// - `Deferred`：转换仍在进行，调用方驱动内部 Future 取得最终结果；
///   Future 的错误语义与同步路径完全一致。
pub enum TransformOutcome {
    /// 转换已同步完成。
    Completed(Body),
    /// 转换将异步完成。
    Deferred(TransformFuture),
}

impl fmt::Debug for TransformOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformOutcome::Completed(body) => {
                f.debug_tuple("TransformOutcome::Completed").field(body).finish()
            }
            TransformOutcome::Deferred(_) => f.write_str("TransformOutcome::Deferred(..)"),
        }
    }
}

/// `DataFormat` 是可插拔的双向编解码能力，对象安全。
///
/// # 设计初衷（Why）
/// - 以单一 Trait 同时表达编码与解码两个方向，便于端点按配置选择其一；
/// - 对象安全使运行期装配（`Arc<dyn DataFormat>`）成为可能，实现方无需
///   暴露具体类型；
/// - 生命周期经由 [`Service`] 超 Trait 继承，端点可将编解码器与自身的
///   启动/停止编排为一个整体。
///
/// # 行为逻辑（How）
/// 1. `descriptor` 返回实现的稳定身份标签；
/// 2. `marshal` 把业务侧消息体转换为线上表示；
/// 3. `unmarshal` 执行相反方向；
/// 4. 每次调用只处理一个方向，结果通过 [`TransformOutcome`] 表达完成形态。
///
/// # 契约说明（What）
/// - **输入**：消息体按值传入，实现获得所有权，转换失败时原消息体不保证保留；
/// - **前置条件**：调用发生在 `start` 完成之后、`stop` 开始之前，由装配方保证；
/// - **后置条件**：失败必须返回语义化的 [`CoreError`]（建议使用
///   [`crate::error::codes::CODEC_MARSHAL`] / [`CODEC_UNMARSHAL`](crate::error::codes::CODEC_UNMARSHAL)
///   域下的码值），调用链不会对其做任何包装或翻译。
///
/// # 风险提示（Trade-offs）
/// - Trait 自身不维持并发防护；若实现内部有可变状态，需自行保证并发安全，
///   或在文档中声明单飞（single-flight）使用前提。
pub trait DataFormat: Service + Send + Sync + 'static + Sealed {
    /// 返回数据格式描述符。
    fn descriptor(&self) -> &DataFormatDescriptor;

    /// 编码：业务表示 → 线上表示。
    fn marshal(&self, body: Body) -> Result<TransformOutcome, CoreError>;

    /// 解码：线上表示 → 业务表示。
    fn unmarshal(&self, body: Body) -> Result<TransformOutcome, CoreError>;
}
