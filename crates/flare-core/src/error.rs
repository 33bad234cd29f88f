use alloc::{borrow::Cow, boxed::Box};
use core::fmt;

use crate::Error;

/// 对象安全的底层错误原因，要求可跨线程传递。
pub type ErrorCause = Box<dyn Error + Send + Sync + 'static>;

/// 框架统一的结果别名，默认错误域为 [`CoreError`]。
pub type Result<T, E = CoreError> = core::result::Result<T, E>;

/// `CoreError` 表示 `flare-core` 跨层共享的稳定错误域，是所有可观察错误的最终形态。
///
/// # 设计背景（Why）
/// - 端点、编解码器与生命周期协调在不同层次产生的故障需要合流为统一的错误码，
///   以便日志与告警系统执行精确的自动化治理。
/// - 框架需兼容 `no_std + alloc` 场景，因此不依赖 `std::error::Error`，而是复用
///   crate 内部定义的轻量 [`Error`] 抽象。
///
/// # 逻辑解析（How）
/// - 结构体以 Builder 风格方法叠加底层原因，并通过 `source()` 暴露完整链路；
/// - 错误码 `code` 始终为 `'static` 字符串，承载稳定语义；`message` 面向排障人员。
///
/// # 契约说明（What）
/// - **前置条件**：调用方必须使用 [`codes`] 模块或遵循 `<域>.<语义>` 约定的
///   自定义码值；
/// - **返回值**：构造函数返回拥有所有权的 `CoreError`，可安全跨线程移动；
/// - **后置条件**：除非显式调用 `with_cause`/`set_cause`，错误不包含底层原因。
///
/// # 设计取舍与风险（Trade-offs）
/// - 采用 `Cow` 保存消息，静态文案零分配，动态描述按需堆分配；
/// - 结构体仅负责承载信息，不执行任何格式化或指标上报逻辑，由调用方处理。
#[derive(Debug)]
pub struct CoreError {
    code: &'static str,
    message: Cow<'static, str>,
    cause: Option<ErrorCause>,
}

impl CoreError {
    /// 构造核心错误。
    ///
    /// # 契约定义（What）
    /// - `code`：遵循 `<领域>.<语义>` 约定的稳定错误码；
    /// - `message`：面向排障人员的自然语言描述，可为 `&'static str` 或堆分配字符串；
    /// - **后置条件**：返回的错误默认不含底层原因，可稍后通过
    ///   [`with_cause`](Self::with_cause) 填充。
    pub fn new(code: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// 附带底层原因并返回新的核心错误。
    pub fn with_cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// 为现有错误设置底层原因。
    pub fn set_cause(&mut self, cause: impl Error + Send + Sync + 'static) {
        self.cause = Some(Box::new(cause));
    }

    /// 获取稳定错误码。
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// 获取描述。
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 获取底层原因。
    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_ref()
            .map(|boxed| boxed.as_ref() as &(dyn Error + 'static))
    }
}

/// 稳定错误码表，所有码值遵循 `<领域>.<语义>` 命名并承诺跨版本不变。
///
/// # 设计背景（Why）
/// - 日志、指标与告警按错误码聚合；若各模块自行拼接字符串，语义会随时间漂移。
/// - 将码值集中声明为常量，调用方可获得编译期检查与单点演进能力。
pub mod codes {
    /// 入参违反基础约束（空字符串、非法取值等）。
    pub const APP_INVALID_ARGUMENT: &str = "app.invalid_argument";

    /// 端点配置不完整或取值非法，在构造阶段即被拒绝。
    pub const ENDPOINT_INVALID_CONFIG: &str = "endpoint.invalid_config";

    /// 请求了端点在结构上不可能支持的能力（例如向仅作处理节点的端点索要消费者）。
    pub const ENDPOINT_UNSUPPORTED_OPERATION: &str = "endpoint.unsupported_operation";

    /// 生命周期状态机收到当前状态下非法的信号。
    pub const LIFECYCLE_INVALID_TRANSITION: &str = "lifecycle.invalid_transition";

    /// 在 start 完成之前（或 stop 之后）调用了运行期能力。
    pub const LIFECYCLE_NOT_STARTED: &str = "lifecycle.not_started";

    /// 编码（marshal）方向的转换失败。
    pub const CODEC_MARSHAL: &str = "codec.marshal";

    /// 解码（unmarshal）方向的转换失败。
    pub const CODEC_UNMARSHAL: &str = "codec.unmarshal";
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_carries_code_and_message() {
        // Why: 日志按 `[code] message` 约定聚合，格式变化会破坏既有告警规则。
        let err = CoreError::new(codes::APP_INVALID_ARGUMENT, "input must not be blank");
        assert_eq!(
            err.to_string(),
            "[app.invalid_argument] input must not be blank"
        );
    }

    #[test]
    fn cause_chain_is_reachable_via_source() {
        // Why: 排障时需要沿 `source()` 还原底层原因，确认链路不中断。
        let root = CoreError::new(codes::CODEC_MARSHAL, "payload rejected");
        let err = CoreError::new(codes::LIFECYCLE_INVALID_TRANSITION, "start failed")
            .with_cause(root);
        let source = Error::source(&err).expect("cause should be present");
        assert!(source.to_string().contains("codec.marshal"));
    }
}
