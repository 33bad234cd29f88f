//! 异步处理步骤契约：路由引擎调度的最小工作单元。

use alloc::boxed::Box;
use core::fmt;

use crate::{CoreError, Result, exchange::Exchange, future::BoxFuture};

/// 延迟完成的处理结果。
pub type ProcessFuture = BoxFuture<'static, Result<Exchange, CoreError>>;

/// 单次处理调用的完成形态。
///
/// # 设计目标（Why）
/// - “已经完成”与“稍后完成”是路由引擎调度决策的关键输入；用枚举而非
///   布尔值表达，使两种情况在类型层面不可混淆；
/// - `Pending` 分支直接携带续体，完成通知不再依赖旁路回调对象。
///
/// # 契约说明（What）
/// - `Completed`：处理已同步结束，交换对象立即可交给下一跳；
/// - `Pending`：处理仍在进行，引擎驱动内部 Future 取得最终交换对象；
///   Future 的错误与同步路径同语义，不做二次包装。
pub enum ProcessOutcome {
    /// 处理已同步完成。
    Completed(Exchange),
    /// 处理将异步完成。
    Pending(ProcessFuture),
}

impl fmt::Debug for ProcessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessOutcome::Completed(exchange) => f
                .debug_tuple("ProcessOutcome::Completed")
                .field(exchange)
                .finish(),
            ProcessOutcome::Pending(_) => f.write_str("ProcessOutcome::Pending(..)"),
        }
    }
}

/// 路由管线中的处理步骤。
///
/// # 设计背景（Why）
/// - 端点产出的运行期单元、各类中间转换器都以该形状插入管线，路由引擎
///   只面向此契约调度，不关心背后的实现细节。
///
/// # 契约说明（What）
/// - **输入**：处理步骤获得交换对象的所有权；完成后通过返回值交还；
/// - **调度**：引擎可在任意线程调用 `process`，本契约不引入额外的线程策略；
/// - **失败**：错误按原样向调用方传播，重试与补偿策略归引擎所有。
pub trait Processor: Send + Sync + 'static {
    /// 处理一个交换对象。
    fn process(&self, exchange: Exchange) -> Result<ProcessOutcome, CoreError>;
}

/// 对象安全的处理步骤包装。
pub type BoxProcessor = Box<dyn Processor>;
