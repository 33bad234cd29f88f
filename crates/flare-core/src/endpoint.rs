//! 端点契约：路由引擎与具体端点实现之间的工厂边界。

use alloc::{boxed::Box, sync::Arc};
use core::fmt;

use crate::{
    CoreError, Result, processor::BoxProcessor, service::Service, types::NonEmptyStr,
};

/// 端点地址标识：`scheme://path` 形式的稳定身份。
///
/// # 契约说明（What）
/// - `scheme` 标明端点家族（例如 `transcode`），`path` 在家族内唯一；
/// - 二者均满足非空约束；本类型只承载身份，不负责任何 URI 解析或参数绑定。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EndpointUri {
    scheme: NonEmptyStr,
    path: NonEmptyStr,
}

impl EndpointUri {
    /// 构造端点地址，构造期完成非空校验。
    pub fn new(scheme: impl Into<Arc<str>>, path: impl Into<Arc<str>>) -> Result<Self> {
        Ok(Self {
            scheme: NonEmptyStr::new(scheme)?,
            path: NonEmptyStr::new(path)?,
        })
    }

    /// 端点家族标识。
    pub fn scheme(&self) -> &str {
        self.scheme.as_str()
    }

    /// 家族内路径。
    pub fn path(&self) -> &str {
        self.path.as_str()
    }
}

impl fmt::Display for EndpointUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.path)
    }
}

/// 消息来源（消费者）边界标记。
///
/// # 契约说明（What）
/// - 消费者是把外部事件注入管线的受管组件；本 crate 只声明边界，
///   不提供任何实现；
/// - 结构上不支持消费的端点在工厂方法中以
///   [`crate::error::codes::ENDPOINT_UNSUPPORTED_OPERATION`] 拒绝。
pub trait Consumer: Service + Send + Sync + 'static {}

/// 端点：配置的长生命周期载体与运行期单元的工厂。
///
/// # 设计背景（Why）
/// - 路由引擎面向统一的端点契约装配管线：向端点索要生产者（处理步骤）
///   或消费者（消息来源），并随宿主驱动其生命周期；
/// - 单例语义显式化（`is_singleton`），允许框架按配置缓存并复用同一实例，
///   而不是每次引用都构造新对象。
///
/// # 契约说明（What）
/// - `uri`：端点的稳定身份，框架以此作为缓存键；
/// - `is_singleton`：返回 `true` 表示同一配置可安全共享一个实例；
/// - `create_producer`：构造一个新的处理步骤，要求无副作用、可重复调用；
/// - `create_consumer`：构造消息来源；结构上不支持消费的端点必须
///   确定性地失败，无论处于何种生命周期状态；
/// - 生命周期经由 [`Service`] 超 Trait 继承，`start`/`stop` 由宿主串行调用。
pub trait Endpoint: Service + Send + Sync + 'static {
    /// 端点地址标识。
    fn uri(&self) -> &EndpointUri;

    /// 是否允许框架按配置复用单个实例。
    fn is_singleton(&self) -> bool;

    /// 构造插入管线的处理步骤。
    fn create_producer(&self) -> Result<BoxProcessor, CoreError>;

    /// 构造消息来源，`sink` 为消费到的交换对象应交付的下游处理步骤。
    fn create_consumer(&self, sink: BoxProcessor) -> Result<Box<dyn Consumer>, CoreError>;
}
