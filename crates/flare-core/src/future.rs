use alloc::boxed::Box;
use core::{future::Future, pin::Pin};

/// `BoxFuture` 是 `flare-core` 在 `no_std + alloc` 下使用的通用 Future 包装。
///
/// # 设计背景（Why）
/// - 统一 Future 表达，使对象安全的契约（处理步骤、延迟转换）无需泛型参数。
///
/// # 契约说明（What）
/// - 约束 Future 为 `Send + 'a`，可安全跨线程调度。
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// `LocalBoxFuture` 封装 `!Send` Future。
///
/// # 契约说明（What）
/// - 仅需满足 `'a` 生命周期约束，适用于单线程执行器场景。
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
