//! 转换包装器：把编解码器的单个方向适配为管线可调用的处理步骤。
//!
//! # 模块职责（Why）
//! - [`MarshalProcessor`] / [`UnmarshalProcessor`] 各自只认一个方向，把
//!   [`DataFormat`] 的对应操作套上 [`Processor`] 的外形；
//! - [`ActiveTransform`] 以标签联合承载“启动后恰好存在一个包装器”的不变量：
//!   两个变体互斥由类型系统保证，不存在“双活”或“判空兜底”的状态。

use alloc::{boxed::Box, sync::Arc};
use core::fmt;

use flare_core::{
    CoreError, DataFormat, Exchange, ProcessOutcome, Processor, Result, Service, ServiceSignal,
    ServiceState, ServiceStateCell, StateAdvance, TransformOutcome,
};

use crate::operation::Operation;

/// 把一次转换结果回填进交换对象，并翻译为处理步骤的完成形态。
///
/// 同步完成直接回填；延迟完成把回填动作挪进续体，错误语义两条路径一致。
fn into_process_outcome(
    mut exchange: Exchange,
    outcome: TransformOutcome,
) -> Result<ProcessOutcome, CoreError> {
    match outcome {
        TransformOutcome::Completed(body) => {
            exchange.set_body(body);
            Ok(ProcessOutcome::Completed(exchange))
        }
        TransformOutcome::Deferred(future) => Ok(ProcessOutcome::Pending(Box::pin(async move {
            let body = future.await?;
            exchange.set_body(body);
            Ok(exchange)
        }))),
    }
}

/// 编码方向的转换包装器。
///
/// # 契约说明（What）
/// - `process` 取走交换对象的消息体，交给编解码器的 marshal 方向，结果
///   （或失败）原样向上传播，自身不做缓冲、重试或错误翻译；
/// - 生命周期由内部状态单元记录，`start`/`stop` 各只生效一次。
pub struct MarshalProcessor {
    format: Arc<dyn DataFormat>,
    state: ServiceStateCell,
}

impl MarshalProcessor {
    pub(crate) fn new(format: Arc<dyn DataFormat>) -> Self {
        Self {
            format,
            state: ServiceStateCell::new(),
        }
    }

    /// 当前生命周期状态，供诊断与测试观察。
    pub fn state(&self) -> ServiceState {
        self.state.state()
    }
}

impl Service for MarshalProcessor {
    fn start(&self) -> Result<(), CoreError> {
        if let StateAdvance::Noop { .. } = self.state.on_signal(ServiceSignal::StartRequested)? {
            return Ok(());
        }
        self.state.on_signal(ServiceSignal::StartCompleted)?;
        Ok(())
    }

    fn stop(&self) -> Result<(), CoreError> {
        if let StateAdvance::Noop { .. } = self.state.on_signal(ServiceSignal::StopRequested)? {
            return Ok(());
        }
        self.state.on_signal(ServiceSignal::StopCompleted)?;
        Ok(())
    }
}

impl Processor for MarshalProcessor {
    fn process(&self, mut exchange: Exchange) -> Result<ProcessOutcome, CoreError> {
        let body = exchange.take_body();
        let outcome = self.format.marshal(body)?;
        into_process_outcome(exchange, outcome)
    }
}

impl fmt::Debug for MarshalProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarshalProcessor")
            .field("format", &self.format.descriptor().name())
            .field("state", &self.state.state())
            .finish()
    }
}

/// 解码方向的转换包装器，与 [`MarshalProcessor`] 镜像对称。
pub struct UnmarshalProcessor {
    format: Arc<dyn DataFormat>,
    state: ServiceStateCell,
}

impl UnmarshalProcessor {
    pub(crate) fn new(format: Arc<dyn DataFormat>) -> Self {
        Self {
            format,
            state: ServiceStateCell::new(),
        }
    }

    /// 当前生命周期状态，供诊断与测试观察。
    pub fn state(&self) -> ServiceState {
        self.state.state()
    }
}

impl Service for UnmarshalProcessor {
    fn start(&self) -> Result<(), CoreError> {
        if let StateAdvance::Noop { .. } = self.state.on_signal(ServiceSignal::StartRequested)? {
            return Ok(());
        }
        self.state.on_signal(ServiceSignal::StartCompleted)?;
        Ok(())
    }

    fn stop(&self) -> Result<(), CoreError> {
        if let StateAdvance::Noop { .. } = self.state.on_signal(ServiceSignal::StopRequested)? {
            return Ok(());
        }
        self.state.on_signal(ServiceSignal::StopCompleted)?;
        Ok(())
    }
}

impl Processor for UnmarshalProcessor {
    fn process(&self, mut exchange: Exchange) -> Result<ProcessOutcome, CoreError> {
        let body = exchange.take_body();
        let outcome = self.format.unmarshal(body)?;
        into_process_outcome(exchange, outcome)
    }
}

impl fmt::Debug for UnmarshalProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnmarshalProcessor")
            .field("format", &self.format.descriptor().name())
            .field("state", &self.state.state())
            .finish()
    }
}

/// 启动后存活的那个包装器：两个方向互斥，由枚举构造保证。
///
/// # 设计背景（Why）
/// - 用标签联合替代“两个可空字段”，使“两个包装器同时存在”与“方向和
///   包装器不匹配”这两类非法状态在类型层面不可表达；
/// - 分发即模式匹配：不存在“否则就当解码”的隐式兜底分支。
#[derive(Debug)]
pub enum ActiveTransform {
    /// 编码方向已装配。
    Marshal(MarshalProcessor),
    /// 解码方向已装配。
    Unmarshal(UnmarshalProcessor),
}

impl ActiveTransform {
    /// 依据配置方向装配对应的包装器。
    pub(crate) fn assemble(operation: Operation, format: Arc<dyn DataFormat>) -> Self {
        match operation {
            Operation::Marshal => ActiveTransform::Marshal(MarshalProcessor::new(format)),
            Operation::Unmarshal => ActiveTransform::Unmarshal(UnmarshalProcessor::new(format)),
        }
    }

    /// 当前变体对应的操作方向。
    pub fn operation(&self) -> Operation {
        match self {
            ActiveTransform::Marshal(_) => Operation::Marshal,
            ActiveTransform::Unmarshal(_) => Operation::Unmarshal,
        }
    }

    /// 当前生命周期状态。
    pub fn state(&self) -> ServiceState {
        match self {
            ActiveTransform::Marshal(processor) => processor.state(),
            ActiveTransform::Unmarshal(processor) => processor.state(),
        }
    }
}

impl Service for ActiveTransform {
    fn start(&self) -> Result<(), CoreError> {
        match self {
            ActiveTransform::Marshal(processor) => processor.start(),
            ActiveTransform::Unmarshal(processor) => processor.start(),
        }
    }

    fn stop(&self) -> Result<(), CoreError> {
        match self {
            ActiveTransform::Marshal(processor) => processor.stop(),
            ActiveTransform::Unmarshal(processor) => processor.stop(),
        }
    }
}

impl Processor for ActiveTransform {
    fn process(&self, exchange: Exchange) -> Result<ProcessOutcome, CoreError> {
        match self {
            ActiveTransform::Marshal(processor) => processor.process(exchange),
            ActiveTransform::Unmarshal(processor) => processor.process(exchange),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use flare_core::test_stubs::codec::MarkerDataFormat;
    use flare_core::{Body, ExchangeId};

    fn text_exchange(id: &str, body: &str) -> Exchange {
        Exchange::new(
            ExchangeId::parse(id.to_string()).expect("valid id"),
            Body::Text(body.to_string()),
        )
    }

    #[test]
    fn marshal_wrapper_only_drives_the_encode_direction() {
        let format: Arc<dyn DataFormat> = Arc::new(MarkerDataFormat::new("#"));
        let wrapper = MarshalProcessor::new(format);
        let outcome = wrapper
            .process(text_exchange("ex-1", "X"))
            .expect("marshal succeeds");
        match outcome {
            ProcessOutcome::Completed(exchange) => {
                assert_eq!(exchange.body().as_text(), Some("X#"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn unmarshal_wrapper_only_drives_the_decode_direction() {
        let format: Arc<dyn DataFormat> = Arc::new(MarkerDataFormat::new("#"));
        let wrapper = UnmarshalProcessor::new(format);
        let outcome = wrapper
            .process(text_exchange("ex-2", "X#"))
            .expect("unmarshal succeeds");
        match outcome {
            ProcessOutcome::Completed(exchange) => {
                assert_eq!(exchange.body().as_text(), Some("X"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn assemble_picks_the_variant_matching_the_operation() {
        let format: Arc<dyn DataFormat> = Arc::new(MarkerDataFormat::new("#"));
        let marshal = ActiveTransform::assemble(Operation::Marshal, Arc::clone(&format));
        assert_eq!(marshal.operation(), Operation::Marshal);
        let unmarshal = ActiveTransform::assemble(Operation::Unmarshal, format);
        assert_eq!(unmarshal.operation(), Operation::Unmarshal);
    }

    #[test]
    fn wrapper_lifecycle_is_one_shot() {
        let format: Arc<dyn DataFormat> = Arc::new(MarkerDataFormat::new("#"));
        let wrapper = ActiveTransform::assemble(Operation::Marshal, format);
        assert_eq!(wrapper.state(), ServiceState::Created);
        wrapper.start().expect("first start");
        assert_eq!(wrapper.state(), ServiceState::Started);
        wrapper.stop().expect("first stop");
        assert_eq!(wrapper.state(), ServiceState::Stopped);
        assert!(wrapper.start().is_err());
    }
}
