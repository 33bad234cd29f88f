#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![allow(private_bounds)]
#![doc = "flare-core: 消息路由框架的核心契约。"]
#![doc = ""]
#![doc = "本 crate 只发布边界契约：交换对象（Exchange）、可插拔的双向编解码能力"]
#![doc = "（DataFormat）、异步处理步骤（Processor）、受管生命周期（Service）以及"]
#![doc = "端点工厂面（Endpoint）。任何具体端点、编解码器或路由引擎都在下游 crate 中"]
#![doc = "实现，并且只通过这里定义的类型对话。"]
#![doc = ""]
#![doc = "== 内存分配依赖 =="]
#![doc = "`flare-core` 定位于 `no_std + alloc` 场景：契约大量依赖 [`alloc`] 中的"]
#![doc = "`Box`、`Arc`、`Vec` 来支撑对象安全与跨线程传递。纯 `no_std`（无分配器）"]
#![doc = "环境暂不支持。"]

extern crate alloc;

mod sealed;

pub mod codec;
pub mod endpoint;
pub mod error;
pub mod exchange;
pub mod future;
pub mod ids;
pub mod prelude;
pub mod processor;
pub mod service;
/// 测试桩命名空间，集中暴露框架官方维护的 `Marker`/`Failing`/`Recording` 实现，
/// 供集成测试与示例复用。
///
/// # 设计背景（Why）
/// - 统一维护常见桩对象，避免在各处重复定义相似的可逆编解码器；
/// - 当核心契约演进时，通过单点更新保证所有测试同步适配。
///
/// # 使用方式（How）
/// - 通过 `use flare_core::test_stubs::codec::*;` 引入需要的桩类型；
/// - 所有桩对象在 `no_std + alloc` 环境同样可用，便于运行最小化集成测试。
pub mod test_stubs;
pub mod types;

pub use codec::{ContentType, DataFormat, DataFormatDescriptor, TransformFuture, TransformOutcome};
pub use endpoint::{Consumer, Endpoint, EndpointUri};
pub use error::codes;
pub use error::{CoreError, ErrorCause, Result};
pub use exchange::{Body, Exchange};
pub use future::{BoxFuture, LocalBoxFuture};
pub use ids::ExchangeId;
pub use processor::{BoxProcessor, ProcessFuture, ProcessOutcome, Processor};
pub use service::{
    Service, ServiceSignal, ServiceState, ServiceStateCell, StateAdvance, start_all, stop_all,
};
pub use types::NonEmptyStr;

use alloc::boxed::Box;
use core::fmt;

/// `flare-core` 中所有错误必须实现的 `no_std` 基础 Trait。
///
/// # 设计背景（Why）
/// - `std::error::Error` 在 `no_std` 环境中不可用，因此需要一个对象安全、
///   与平台无关的错误抽象来串联底层错误链。
/// - 该 Trait 作为所有错误类型的最小公共接口，帮助框架在 `alloc` 场景下
///   完成跨模块错误传递。
///
/// # 契约说明（What）
/// - 实现者必须提供 `Debug` 与 `Display`，便于日志与可观测性收集；
/// - `source` 返回链路上的上游错误，与 `std::error::Error::source` 语义一致；
/// - 返回引用的生命周期受限于 `self`，以防悬垂引用。
///
/// # 风险提示（Trade-offs）
/// - Trait 本身不要求 `Send + Sync`，避免对受限设备强加负担；需要线程安全时
///   请使用 [`ErrorCause`] 类型别名。
pub trait Error: fmt::Debug + fmt::Display + crate::sealed::Sealed {
    /// 返回当前错误的上游来源。
    #[allow(unused_parens)]
    fn source(&self) -> Option<&(dyn Error + 'static)>;
}

impl<E> Error for Box<E>
where
    E: Error + ?Sized,
{
    #[allow(unused_parens)]
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        (**self).source()
    }
}
