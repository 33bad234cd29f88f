//! 实现层配置错误：在进入核心错误域之前保留结构化信息。

use alloc::{format, string::String};

use thiserror::Error;

use flare_core::{CoreError, codes};

/// 端点配置在构造阶段被拒绝的原因。
///
/// # 设计背景（Why）
/// - 配置错误在实现层以枚举承载，调用方可以精确匹配；跨越 crate 边界时
///   统一降级为 [`CoreError`]（`endpoint.invalid_config`），由日志与告警
///   按稳定错误码聚合。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointConfigError {
    /// 操作方向不在 {"marshal", "unmarshal"} 之内。
    #[error("operation `{0}` is not recognized (expected `marshal` or `unmarshal`)")]
    UnknownOperation(String),
}

impl From<EndpointConfigError> for CoreError {
    fn from(err: EndpointConfigError) -> Self {
        CoreError::new(codes::ENDPOINT_INVALID_CONFIG, format!("{err}"))
    }
}
