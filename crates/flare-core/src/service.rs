//! 受管生命周期契约：统一表达“可启动、可停止”的组件及其状态机。
//!
//! # 设计目标（Why）
//! - 端点、编解码器与转换包装器都需要随宿主一起启动/停止；把生命周期抽象为
//!   统一契约后，协调方可以把它们当作同质集合成组操作；
//! - 状态机显式化（而非散落的布尔字段）使“重复启动”“停止后再启动”这类
//!   边界行为可被契约测试精确约束。
//!
//! # 并发约束（Contract）
//! - `start`/`stop` 假定由外层生命周期管理器串行调用，二者之间以及与在途
//!   `process` 调用之间的互斥不在本模块内实现；
//! - [`ServiceStateCell`] 内部的自旋锁仅保证状态读写本身的原子性，不构成
//!   对上述串行化前提的替代。

use alloc::format;
use core::fmt;

use spin::Mutex;

use crate::{CoreError, Result, error::codes};

/// 可启动、可停止的受管组件。
///
/// # 契约说明（What）
/// - `start`：使组件进入可服务状态；返回错误表示启动失败，调用方负责决定
///   后续策略（本契约不要求实现者自动回滚）；
/// - `stop`：释放组件持有的资源；与 `start` 一样由外层串行调用；
/// - 两个方法都提供空实现默认值，无状态组件（如纯函数式编解码器）无需
///   编写任何生命周期代码。
///
/// # 风险提示（Trade-offs）
/// - 方法签名使用 `&self`，实现者如需内部状态请自行选择合适的同步原语；
/// - 契约不区分“幂等的重复调用”与“非法的乱序调用”，需要区分时请组合
///   [`ServiceStateCell`]。
pub trait Service {
    /// 启动组件。
    fn start(&self) -> Result<(), CoreError> {
        Ok(())
    }

    /// 停止组件。
    fn stop(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// 生命周期阶段，覆盖从构造到终止的完整链路。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceState {
    /// 已构造，尚未启动。
    Created,
    /// 启动流程进行中。
    Starting,
    /// 启动完成，可对外服务。
    Started,
    /// 停止流程进行中。
    Stopping,
    /// 已终止，不可再启动。
    Stopped,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ServiceState::Created => "created",
            ServiceState::Starting => "starting",
            ServiceState::Started => "started",
            ServiceState::Stopping => "stopping",
            ServiceState::Stopped => "stopped",
        };
        f.write_str(text)
    }
}

/// 驱动生命周期状态机的输入信号。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceSignal {
    /// 请求开始启动。
    StartRequested,
    /// 启动流程完成。
    StartCompleted,
    /// 请求开始停止。
    StopRequested,
    /// 停止流程完成。
    StopCompleted,
}

/// 状态推进结果，明确指示“是否发生状态跃迁”。
///
/// # 设计目标（Why）
/// - 让调用方据此区分“首次生效的请求”与“重复收到的信号”，避免重复执行
///   装配或拆除动作；
/// - 泛型参数 `S` 支持任何实现 `Copy + Eq` 的状态类型，便于复用。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateAdvance<S>
where
    S: Copy + Eq,
{
    /// 状态未变化，通常表示收到重复信号。
    Noop {
        /// 当前状态。
        state: S,
    },
    /// 状态发生跃迁。
    Transition {
        /// 跃迁前状态。
        from: S,
        /// 跃迁后状态。
        to: S,
    },
}

/// 生命周期状态单元：以内部自旋锁保护的一次性状态机。
///
/// # 设计背景（Why）
/// - “启动/停止各只发生一次”是协调逻辑的核心不变量；把它下沉到独立类型，
///   端点与包装器只需转发信号，不必重复实现转移表；
/// - 选择自旋锁而非原子枚举，换取转移判定与状态写入的天然原子性，且在
///   `no_std` 环境可用。
///
/// # 行为逻辑（How）
/// - 合法链路：`Created → Starting → Started → Stopping → Stopped`，单向、
///   一次性，到达 `Stopped` 后任何启动信号都是错误；
/// - 在目标状态（或对应的进行中状态）重复收到同向信号返回
///   [`StateAdvance::Noop`]；
/// - 其余组合返回 [`codes::LIFECYCLE_INVALID_TRANSITION`] 错误，状态保持不变。
///
/// # 契约说明（What）
/// - **前置条件**：信号由外层串行发出；自旋锁只保证单次转移的原子性；
/// - **后置条件**：返回 `Transition` 时状态已推进；返回 `Noop` 或错误时
///   状态保持原值。
pub struct ServiceStateCell {
    inner: Mutex<ServiceState>,
}

impl ServiceStateCell {
    /// 创建处于 `Created` 状态的单元。
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ServiceState::Created),
        }
    }

    /// 读取当前状态。
    pub fn state(&self) -> ServiceState {
        *self.inner.lock()
    }

    /// 根据输入信号推进状态机。
    pub fn on_signal(&self, signal: ServiceSignal) -> Result<StateAdvance<ServiceState>> {
        let mut guard = self.inner.lock();
        let current = *guard;
        let next = match (current, signal) {
            (ServiceState::Created, ServiceSignal::StartRequested) => Some(ServiceState::Starting),
            (ServiceState::Starting | ServiceState::Started, ServiceSignal::StartRequested) => None,
            (ServiceState::Starting, ServiceSignal::StartCompleted) => Some(ServiceState::Started),
            (ServiceState::Started, ServiceSignal::StartCompleted) => None,
            (ServiceState::Started, ServiceSignal::StopRequested) => Some(ServiceState::Stopping),
            (
                ServiceState::Created | ServiceState::Stopping | ServiceState::Stopped,
                ServiceSignal::StopRequested,
            ) => None,
            (ServiceState::Stopping, ServiceSignal::StopCompleted) => Some(ServiceState::Stopped),
            (ServiceState::Stopped, ServiceSignal::StopCompleted) => None,
            (from, signal) => {
                return Err(CoreError::new(
                    codes::LIFECYCLE_INVALID_TRANSITION,
                    format!("信号 {signal:?} 在状态 `{from}` 下不合法"),
                ));
            }
        };
        match next {
            Some(to) => {
                *guard = to;
                Ok(StateAdvance::Transition { from: current, to })
            }
            None => Ok(StateAdvance::Noop { state: current }),
        }
    }
}

impl Default for ServiceStateCell {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceStateCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceStateCell").field(&self.state()).finish()
    }
}

/// 按给定顺序启动一组服务。
///
/// # 契约说明（What）
/// - 逐个调用 `start`，遇到第一个失败立即返回该错误；
/// - 已启动的成员不会被回滚，部分启动的补偿策略由调用方决定。
pub fn start_all(services: &[&dyn Service]) -> Result<(), CoreError> {
    for service in services {
        service.start()?;
    }
    Ok(())
}

/// 按给定顺序停止一组服务。
///
/// # 契约说明（What）
/// - 每个成员都会收到 `stop` 信号，即使前面的成员失败；
/// - 若有失败，返回按顺序遇到的第一个错误。
pub fn stop_all(services: &[&dyn Service]) -> Result<(), CoreError> {
    let mut first_error = None;
    for service in services {
        if let Err(err) = service.stop()
            && first_error.is_none()
        {
            first_error = Some(err);
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
