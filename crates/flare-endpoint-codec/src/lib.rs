#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![doc = r#"
# flare-endpoint-codec

## 设计动机（Why）
- **定位**：该 crate 提供 Flare 路由框架中的数据格式端点——给定一个可插拔的
  双向编解码能力（[`DataFormat`](flare_core::DataFormat)）与一个配置方向
  （marshal / unmarshal），把该方向的转换暴露为管线中可路由的一跳。
- **架构角色**：端点是“某种格式存在”与“管线可以调用它”之间的适配层；
  编解码算法本身、路由引擎的调度与补偿、交换对象的设计都是外部协作者，
  本 crate 只在边界上消费它们。
- **设计理念**：配置期立即校验（非法方向在构造时失败）、运行期零分支歧义
  （活动包装器是标签联合，分发即模式匹配）、错误与完成信号原样透传。

## 核心契约（What）
- **输入条件**：构造时提供端点地址、`Arc<dyn DataFormat>` 与解析后的
  [`Operation`]；`start`/`stop` 由宿主串行调用；
- **输出保障**：`create_producer` 无副作用、总是成功；`create_consumer`
  确定性地以 `endpoint.unsupported_operation` 失败——本端点在结构上不可能
  充当消息来源；`is_singleton` 恒为 `true`，框架可按配置复用实例；
- **前置约束**：同一实例的 `start`/`stop` 不得与在途 `process` 并发交错，
  该串行化由外层生命周期管理器保证。

## 实现策略（How）
- **生命周期协调**：`start` 依据配置方向装配 `ActiveTransform` 标签联合中的
  唯一变体，并把 {编解码器, 包装器} 作为一个整体启动；`stop` 以相反顺序
  拆除（包装器先于编解码器）；
- **运行期分发**：生产者在每次调用时从共享槽位读取活动包装器并模式匹配
  委派，自身不做任何转换、缓冲或重试；
- **状态机**：`Created → Starting → Started → Stopping → Stopped` 单向推进，
  重复请求是可观察的空操作，非法跳转是错误。

## 风险与考量（Trade-offs）
- **并发度**：槽位使用自旋读写锁保护，读路径只在克隆 `Arc` 的瞬间持锁，
  编解码调用在锁外执行；
- **部分失败**：启动失败不自动回滚已启动的成员，停止失败不重试——补偿
  策略归宿主所有。
"#]

extern crate alloc;

mod endpoint;
mod error;
mod operation;
mod producer;
mod transform;

pub use endpoint::DataFormatEndpoint;
pub use error::EndpointConfigError;
pub use operation::Operation;
pub use producer::DataFormatProducer;
pub use transform::{ActiveTransform, MarshalProcessor, UnmarshalProcessor};
