//! 数据格式端点：配置载体、运行期单元工厂与生命周期协调器。

use alloc::{boxed::Box, sync::Arc, vec::Vec};
use core::fmt;

use spin::RwLock;
use tracing::debug;

use flare_core::{
    BoxProcessor, Consumer, CoreError, DataFormat, Endpoint, EndpointUri, Result, Service,
    ServiceSignal, ServiceState, ServiceStateCell, StateAdvance, codes, start_all, stop_all,
};

use crate::{operation::Operation, producer::DataFormatProducer, transform::ActiveTransform};

/// 生产者与端点共享的活动包装器槽位。
///
/// 槽位恰好被写入两次：start 时装入，stop 时取出。读路径只在克隆 `Arc`
/// 的瞬间持锁，转换调用在锁外执行。
pub(crate) type ActiveSlot = Arc<RwLock<Option<Arc<ActiveTransform>>>>;

/// 把一个数据格式的单个方向暴露为可路由处理节点的端点。
///
/// # 设计初衷（Why）
/// - 配置（编解码器引用 + 操作方向）需要一个长生命周期的载体，运行期单元
///   则按管线装配次数任意创建；端点承担前者并充当后者的工厂；
/// - 编解码器与转换包装器的启动/停止必须作为一个整体编排，端点是唯一
///   知道二者关系的位置。
///
/// # 行为逻辑（How）
/// 1. 构造期即完成校验：方向是封闭枚举，编解码器引用不可缺省；
/// 2. `start`：推进状态机后，按方向装配 [`ActiveTransform`] 的唯一变体并
///    发布到共享槽位，再把 {编解码器, 包装器} 按此顺序作为一个整体启动；
/// 3. `stop`：从槽位取出包装器，按 {包装器, 编解码器} 的相反顺序拆除；
/// 4. 生产者在每次调用时读取槽位，端点停止后槽位为空，调用以
///    `lifecycle.not_started` 失败。
///
/// # 契约说明（What）
/// - **单例**：`is_singleton` 恒为 `true`，框架可按地址缓存并复用实例；
/// - **串行化前提**：`start`/`stop` 由宿主串行调用，且不与在途 `process`
///   交错；内部锁只保证槽位发布对并发读者可见；
/// - **部分失败**：启动失败原样上抛、不回滚已启动成员；停止会触达拆除
///   集合中的每个成员并上报首个错误。
pub struct DataFormatEndpoint {
    uri: EndpointUri,
    format: Arc<dyn DataFormat>,
    operation: Operation,
    state: ServiceStateCell,
    active: ActiveSlot,
}

impl DataFormatEndpoint {
    /// 以解析完毕的配置构造端点。
    pub fn new(uri: EndpointUri, format: Arc<dyn DataFormat>, operation: Operation) -> Self {
        Self {
            uri,
            format,
            operation,
            state: ServiceStateCell::new(),
            active: Arc::new(RwLock::new(None)),
        }
    }

    /// 以字符串形态的操作方向构造端点；未知取值立即以
    /// `endpoint.invalid_config` 拒绝。
    pub fn with_operation_str(
        uri: EndpointUri,
        format: Arc<dyn DataFormat>,
        operation: &str,
    ) -> Result<Self> {
        let operation = operation.parse::<Operation>()?;
        Ok(Self::new(uri, format, operation))
    }

    /// 配置的操作方向。
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// 配置的编解码器引用。
    pub fn data_format(&self) -> &Arc<dyn DataFormat> {
        &self.format
    }

    /// 当前生命周期状态。
    pub fn state(&self) -> ServiceState {
        self.state.state()
    }

    /// 当前存活的转换包装器（诊断用）；start 之前与 stop 之后为 `None`。
    pub fn active_transform(&self) -> Option<Arc<ActiveTransform>> {
        self.active.read().as_ref().map(Arc::clone)
    }

    /// 当前存活包装器对应的方向（诊断用）。
    pub fn active_operation(&self) -> Option<Operation> {
        self.active.read().as_ref().map(|t| t.operation())
    }
}

impl Service for DataFormatEndpoint {
    fn start(&self) -> Result<(), CoreError> {
        if let StateAdvance::Noop { .. } = self.state.on_signal(ServiceSignal::StartRequested)? {
            return Ok(());
        }

        let transform = Arc::new(ActiveTransform::assemble(
            self.operation,
            Arc::clone(&self.format),
        ));
        *self.active.write() = Some(Arc::clone(&transform));

        start_all(&[
            self.format.as_ref() as &dyn Service,
            transform.as_ref() as &dyn Service,
        ])?;

        self.state.on_signal(ServiceSignal::StartCompleted)?;
        debug!(
            uri = %self.uri,
            operation = %self.operation,
            format = self.format.descriptor().name(),
            "data format endpoint started"
        );
        Ok(())
    }

    fn stop(&self) -> Result<(), CoreError> {
        if let StateAdvance::Noop { .. } = self.state.on_signal(ServiceSignal::StopRequested)? {
            return Ok(());
        }

        let transform = self.active.write().take();
        let mut teardown: Vec<&dyn Service> = Vec::with_capacity(2);
        if let Some(transform) = &transform {
            teardown.push(transform.as_ref() as &dyn Service);
        }
        teardown.push(self.format.as_ref() as &dyn Service);
        stop_all(&teardown)?;

        self.state.on_signal(ServiceSignal::StopCompleted)?;
        debug!(uri = %self.uri, "data format endpoint stopped");
        Ok(())
    }
}

impl Endpoint for DataFormatEndpoint {
    fn uri(&self) -> &EndpointUri {
        &self.uri
    }

    fn is_singleton(&self) -> bool {
        true
    }

    fn create_producer(&self) -> Result<BoxProcessor, CoreError> {
        Ok(Box::new(DataFormatProducer::new(
            Arc::clone(&self.active),
            self.format.descriptor().clone(),
        )))
    }

    fn create_consumer(&self, _sink: BoxProcessor) -> Result<Box<dyn Consumer>, CoreError> {
        Err(CoreError::new(
            codes::ENDPOINT_UNSUPPORTED_OPERATION,
            "data format endpoint cannot act as a message source",
        ))
    }
}

impl fmt::Debug for DataFormatEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataFormatEndpoint")
            .field("uri", &self.uri)
            .field("operation", &self.operation)
            .field("format", &self.format.descriptor().name())
            .field("state", &self.state.state())
            .finish()
    }
}

impl fmt::Display for DataFormatEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.uri, f)
    }
}
