//! 常用契约的一站式导入，推荐下游以 `use flare_core::prelude::*;` 接入。

pub use crate::codec::{
    ContentType, DataFormat, DataFormatDescriptor, TransformFuture, TransformOutcome,
};
pub use crate::endpoint::{Consumer, Endpoint, EndpointUri};
pub use crate::error::{CoreError, ErrorCause, Result, codes};
pub use crate::exchange::{Body, Exchange};
pub use crate::future::{BoxFuture, LocalBoxFuture};
pub use crate::ids::ExchangeId;
pub use crate::processor::{BoxProcessor, ProcessFuture, ProcessOutcome, Processor};
pub use crate::service::{
    Service, ServiceSignal, ServiceState, ServiceStateCell, StateAdvance, start_all, stop_all,
};
pub use crate::types::NonEmptyStr;
