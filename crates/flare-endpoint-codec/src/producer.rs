//! 运行期分发器：管线实际调用的那个处理步骤。

use core::fmt;

use alloc::sync::Arc;
use tracing::trace;

use flare_core::{
    CoreError, DataFormatDescriptor, Exchange, ProcessOutcome, Processor, Result, codes,
};

use crate::endpoint::ActiveSlot;

/// 数据格式端点的生产者：按调用时刻存活的包装器做纯委派。
///
/// # 设计背景（Why）
/// - 生产者按管线装配次数任意创建，自身必须近乎无状态：它只持有端点的
///   共享槽位句柄，调用时读取其中的包装器并转发；
/// - 转发不做任何转换、缓冲或错误翻译，完成形态（同步/异步）与错误都
///   原样返回给路由引擎。
///
/// # 契约说明（What）
/// - **前置条件**：端点已启动；否则槽位为空，调用以
///   `lifecycle.not_started` 失败；
/// - **后置条件**：返回值即包装器的返回值；本类型不持有交换对象的任何
///   副本。
///
/// # 并发说明（Trade-offs）
/// - 槽位读锁只在克隆 `Arc` 的瞬间持有，编解码调用在锁外执行，因此慢速
///   转换不会阻塞端点的停止路径拿写锁之外的读者。
pub struct DataFormatProducer {
    active: ActiveSlot,
    descriptor: DataFormatDescriptor,
}

impl DataFormatProducer {
    pub(crate) fn new(active: ActiveSlot, descriptor: DataFormatDescriptor) -> Self {
        Self { active, descriptor }
    }
}

impl Processor for DataFormatProducer {
    fn process(&self, exchange: Exchange) -> Result<ProcessOutcome, CoreError> {
        let transform = self.active.read().as_ref().map(Arc::clone);
        match transform {
            Some(transform) => {
                trace!(
                    exchange = %exchange.id(),
                    operation = %transform.operation(),
                    "dispatching exchange to active transform"
                );
                transform.process(exchange)
            }
            None => Err(CoreError::new(
                codes::LIFECYCLE_NOT_STARTED,
                "no transform is active; the endpoint has not been started or is already stopped",
            )),
        }
    }
}

impl fmt::Display for DataFormatProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataFormatProducer[{}]", self.descriptor.name())
    }
}

impl fmt::Debug for DataFormatProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataFormatProducer")
            .field("format", &self.descriptor.name())
            .finish()
    }
}
