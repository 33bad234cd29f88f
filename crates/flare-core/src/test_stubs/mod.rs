//! 编解码相关的测试桩集合，集中提供可逆、可失败、可记录的官方实现。
//!
//! # 设计定位（Why）
//! - 端点与管线的测试反复需要“行为完全可预测”的编解码器：可逆转换用于
//!   往返断言，注入失败用于错误传播断言，事件记录用于生命周期顺序断言。
//! - 过去各测试文件内重复定义相似桩类型，接口调整时容易漏改；统一出口后，
//!   契约演进只需单点更新。
//!
//! # 使用方式（How）
//! - 通过 `use flare_core::test_stubs::codec::*;` 引入需要的桩类型。
//! - 所有桩类型只依赖 `alloc` 与 `spin`，可在 `no_std + alloc` 环境复用。
//!
//! # 风险与权衡（Trade-offs）
//! - 桩对象的转换语义刻意简化（追加/剥除固定标记），不能替代真实格式的
//!   正确性验证；
//! - 模块公开为稳定测试 API，新增字段或方法时需同步评估下游测试假设。

pub mod codec {
    //! 数据格式契约的官方桩实现。

    use alloc::{borrow::ToOwned, boxed::Box, format, sync::Arc, vec::Vec};
    use core::future;

    use spin::Mutex;

    use crate::{
        Body, ContentType, CoreError, DataFormat, DataFormatDescriptor, Result, Service,
        TransformOutcome, error::codes,
    };

    /// 生命周期与转换事件的共享日志。
    pub type EventLog = Arc<Mutex<Vec<&'static str>>>;

    /// 可逆的标记编解码器：marshal 在文本尾部追加固定标记，unmarshal 剥除它。
    ///
    /// # 行为概览（How）
    /// - `marshal`：`Text("X")` → `Text("X<marker>")`；
    /// - `unmarshal`：`Text("X<marker>")` → `Text("X")`，缺少标记时返回
    ///   `codec.unmarshal` 错误；
    /// - 非文本消息体在两个方向都被拒绝。
    ///
    /// # 契约说明（What）
    /// - 两个方向互为逆运算，适合往返断言；
    /// - 实例无状态，可安全跨线程共享。
    #[derive(Debug, Clone)]
    pub struct MarkerDataFormat {
        descriptor: DataFormatDescriptor,
        marker: &'static str,
    }

    impl MarkerDataFormat {
        /// 以给定标记构造桩实例。
        pub fn new(marker: &'static str) -> Self {
            Self {
                descriptor: DataFormatDescriptor::new(
                    "marker",
                    ContentType::new("text/plain; charset=utf-8"),
                ),
                marker,
            }
        }

        /// 当前使用的标记文本。
        pub fn marker(&self) -> &'static str {
            self.marker
        }

        fn append(&self, body: Body) -> Result<Body, CoreError> {
            match body {
                Body::Text(mut text) => {
                    text.push_str(self.marker);
                    Ok(Body::Text(text))
                }
                other => Err(CoreError::new(
                    codes::CODEC_MARSHAL,
                    format!("marker codec expects a text body, got {other:?}"),
                )),
            }
        }

        fn strip(&self, body: Body) -> Result<Body, CoreError> {
            match body {
                Body::Text(text) => match text.strip_suffix(self.marker) {
                    Some(stripped) => Ok(Body::Text(stripped.to_owned())),
                    None => Err(CoreError::new(
                        codes::CODEC_UNMARSHAL,
                        format!("payload is missing trailing marker `{}`", self.marker),
                    )),
                },
                other => Err(CoreError::new(
                    codes::CODEC_UNMARSHAL,
                    format!("marker codec expects a text body, got {other:?}"),
                )),
            }
        }
    }

    impl Service for MarkerDataFormat {}

    impl DataFormat for MarkerDataFormat {
        fn descriptor(&self) -> &DataFormatDescriptor {
            &self.descriptor
        }

        fn marshal(&self, body: Body) -> Result<TransformOutcome, CoreError> {
            Ok(TransformOutcome::Completed(self.append(body)?))
        }

        fn unmarshal(&self, body: Body) -> Result<TransformOutcome, CoreError> {
            Ok(TransformOutcome::Completed(self.strip(body)?))
        }
    }

    /// 与 [`MarkerDataFormat`] 同语义，但总是以 `Deferred` 形态返回结果，
    /// 用于验证调用链对异步完成路径的透传。
    #[derive(Debug, Clone)]
    pub struct DeferredMarkerDataFormat {
        inner: MarkerDataFormat,
    }

    impl DeferredMarkerDataFormat {
        /// 以给定标记构造桩实例。
        pub fn new(marker: &'static str) -> Self {
            Self {
                inner: MarkerDataFormat::new(marker),
            }
        }
    }

    impl Service for DeferredMarkerDataFormat {}

    impl DataFormat for DeferredMarkerDataFormat {
        fn descriptor(&self) -> &DataFormatDescriptor {
            self.inner.descriptor()
        }

        fn marshal(&self, body: Body) -> Result<TransformOutcome, CoreError> {
            let result = self.inner.append(body);
            Ok(TransformOutcome::Deferred(Box::pin(future::ready(result))))
        }

        fn unmarshal(&self, body: Body) -> Result<TransformOutcome, CoreError> {
            let result = self.inner.strip(body);
            Ok(TransformOutcome::Deferred(Box::pin(future::ready(result))))
        }
    }

    /// 两个方向都以固定错误失败的桩，用于错误传播断言。
    ///
    /// # 契约说明（What）
    /// - `new`：同步失败，`process` 调用方立即收到错误；
    /// - `deferred`：以 `Deferred` 形态失败，错误从续体中浮出；
    /// - 错误码与消息按构造参数原样传播，便于断言“未被包装”。
    #[derive(Debug, Clone)]
    pub struct FailingDataFormat {
        descriptor: DataFormatDescriptor,
        code: &'static str,
        message: &'static str,
        defer: bool,
    }

    impl FailingDataFormat {
        /// 构造同步失败的桩实例。
        pub fn new(code: &'static str, message: &'static str) -> Self {
            Self {
                descriptor: DataFormatDescriptor::new(
                    "failing",
                    ContentType::new("application/octet-stream"),
                ),
                code,
                message,
                defer: false,
            }
        }

        /// 构造异步失败的桩实例。
        pub fn deferred(code: &'static str, message: &'static str) -> Self {
            let mut stub = Self::new(code, message);
            stub.defer = true;
            stub
        }

        fn fail(&self) -> Result<TransformOutcome, CoreError> {
            let error = CoreError::new(self.code, self.message);
            if self.defer {
                Ok(TransformOutcome::Deferred(Box::pin(future::ready(Err(
                    error,
                )))))
            } else {
                Err(error)
            }
        }
    }

    impl Service for FailingDataFormat {}

    impl DataFormat for FailingDataFormat {
        fn descriptor(&self) -> &DataFormatDescriptor {
            &self.descriptor
        }

        fn marshal(&self, _body: Body) -> Result<TransformOutcome, CoreError> {
            self.fail()
        }

        fn unmarshal(&self, _body: Body) -> Result<TransformOutcome, CoreError> {
            self.fail()
        }
    }

    /// 包装任意数据格式并把生命周期与转换事件写入共享日志。
    ///
    /// # 使用方式（How）
    /// - 通过 [`RecordingDataFormat::log`] 取得日志句柄，在断言阶段读取事件序列；
    /// - 事件名称固定为 `format.start` / `format.stop` / `format.marshal` /
    ///   `format.unmarshal`。
    #[derive(Debug)]
    pub struct RecordingDataFormat<D> {
        inner: D,
        log: EventLog,
    }

    impl<D> RecordingDataFormat<D>
    where
        D: DataFormat,
    {
        /// 包装给定实现并创建新的事件日志。
        pub fn new(inner: D) -> Self {
            Self {
                inner,
                log: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// 共享日志句柄，可在桩实例被装配走之后继续读取。
        pub fn log(&self) -> EventLog {
            Arc::clone(&self.log)
        }

        fn record(&self, event: &'static str) {
            self.log.lock().push(event);
        }
    }

    impl<D> Service for RecordingDataFormat<D>
    where
        D: DataFormat,
    {
        fn start(&self) -> Result<(), CoreError> {
            self.record("format.start");
            self.inner.start()
        }

        fn stop(&self) -> Result<(), CoreError> {
            self.record("format.stop");
            self.inner.stop()
        }
    }

    impl<D> DataFormat for RecordingDataFormat<D>
    where
        D: DataFormat,
    {
        fn descriptor(&self) -> &DataFormatDescriptor {
            self.inner.descriptor()
        }

        fn marshal(&self, body: Body) -> Result<TransformOutcome, CoreError> {
            self.record("format.marshal");
            self.inner.marshal(body)
        }

        fn unmarshal(&self, body: Body) -> Result<TransformOutcome, CoreError> {
            self.record("format.unmarshal");
            self.inner.unmarshal(body)
        }
    }
}
