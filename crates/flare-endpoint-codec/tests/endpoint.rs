//! 数据格式端点的端到端契约测试。
//!
//! 测试统一使用 `flare_core::test_stubs::codec` 中的官方桩：可逆的标记
//! 编解码器负责往返断言，注入失败的桩负责错误透传断言，记录桩负责
//! 生命周期顺序断言。

use std::sync::Arc;

use futures::executor::block_on;

use flare_core::test_stubs::codec::{
    DeferredMarkerDataFormat, FailingDataFormat, MarkerDataFormat, RecordingDataFormat,
};
use flare_core::{
    Body, Consumer, DataFormat, Endpoint, EndpointUri, Exchange, ExchangeId, ProcessOutcome,
    Processor, Service, ServiceState, codes,
};
use flare_endpoint_codec::{DataFormatEndpoint, Operation};

fn endpoint_uri(path: &str) -> EndpointUri {
    EndpointUri::new("transcode", path).expect("valid uri")
}

fn text_exchange(id: &str, body: &str) -> Exchange {
    Exchange::new(
        ExchangeId::parse(id.to_string()).expect("valid id"),
        Body::Text(body.to_string()),
    )
}

fn completed_text(outcome: ProcessOutcome) -> String {
    match outcome {
        ProcessOutcome::Completed(exchange) => exchange
            .body()
            .as_text()
            .expect("text body expected")
            .to_string(),
        other => panic!("expected synchronous completion, got {other:?}"),
    }
}

#[test]
fn start_assembles_exactly_the_wrapper_matching_the_operation() {
    // Why: 启动后必须恰好存在一个包装器，且方向与配置一致。
    for operation in [Operation::Marshal, Operation::Unmarshal] {
        let format: Arc<dyn DataFormat> = Arc::new(MarkerDataFormat::new("#"));
        let endpoint = DataFormatEndpoint::new(endpoint_uri("orders"), format, operation);
        assert_eq!(endpoint.active_operation(), None);

        endpoint.start().expect("start succeeds");
        assert_eq!(endpoint.state(), ServiceState::Started);
        assert_eq!(endpoint.active_operation(), Some(operation));

        endpoint.stop().expect("stop succeeds");
        assert_eq!(endpoint.active_operation(), None);
    }
}

#[test]
fn marshal_round_trip_through_two_endpoints() {
    // How: 第一个端点配置 marshal，处理 "X" 得到 "X#"；第二个端点在同一桩
    // 语义上配置 unmarshal，把 "X#" 还原为 "X"。
    let marshal_endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders/out"),
        Arc::new(MarkerDataFormat::new("#")),
        Operation::Marshal,
    );
    marshal_endpoint.start().expect("start marshal endpoint");
    let producer = marshal_endpoint
        .create_producer()
        .expect("producer is always available");
    let encoded = completed_text(
        producer
            .process(text_exchange("ex-1", "X"))
            .expect("marshal succeeds"),
    );
    assert_eq!(encoded, "X#");

    let unmarshal_endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders/in"),
        Arc::new(MarkerDataFormat::new("#")),
        Operation::Unmarshal,
    );
    unmarshal_endpoint.start().expect("start unmarshal endpoint");
    let producer = unmarshal_endpoint
        .create_producer()
        .expect("producer is always available");
    let decoded = completed_text(
        producer
            .process(text_exchange("ex-2", &encoded))
            .expect("unmarshal succeeds"),
    );
    assert_eq!(decoded, "X");
}

#[test]
fn producer_forwards_exchange_and_headers_untouched() {
    // Why: 分发器是纯委派，交换标识与头部必须原样到达另一端。
    let endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders"),
        Arc::new(MarkerDataFormat::new("!")),
        Operation::Marshal,
    );
    endpoint.start().expect("start succeeds");
    let producer = endpoint.create_producer().expect("producer");

    let exchange = text_exchange("ex-42", "payload")
        .with_header("route", "inbound")
        .expect("valid header");
    let outcome = producer.process(exchange).expect("marshal succeeds");
    match outcome {
        ProcessOutcome::Completed(exchange) => {
            assert_eq!(exchange.id().as_str(), "ex-42");
            assert_eq!(exchange.headers().len(), 1);
            assert_eq!(exchange.body().as_text(), Some("payload!"));
        }
        other => panic!("expected synchronous completion, got {other:?}"),
    }
}

#[test]
fn deferred_codec_surfaces_as_pending_and_completes_with_the_transform() {
    // Why: 异步完成形态必须原样透传——生产者返回 Pending，驱动续体后才
    // 得到转换结果。
    let endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders"),
        Arc::new(DeferredMarkerDataFormat::new("#")),
        Operation::Marshal,
    );
    endpoint.start().expect("start succeeds");
    let producer = endpoint.create_producer().expect("producer");

    let outcome = producer
        .process(text_exchange("ex-3", "X"))
        .expect("dispatch succeeds");
    match outcome {
        ProcessOutcome::Pending(future) => {
            let exchange = block_on(future).expect("deferred transform succeeds");
            assert_eq!(exchange.body().as_text(), Some("X#"));
        }
        other => panic!("expected pending completion, got {other:?}"),
    }
}

#[test]
fn synchronous_codec_failure_propagates_unmodified() {
    // Why: 编解码错误不得被包装或翻译，错误码与消息必须与桩注入的一致。
    let endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders"),
        Arc::new(FailingDataFormat::new(codes::CODEC_MARSHAL, "boom")),
        Operation::Marshal,
    );
    endpoint.start().expect("start succeeds");
    let producer = endpoint.create_producer().expect("producer");

    let err = producer
        .process(text_exchange("ex-4", "X"))
        .expect_err("codec failure must surface");
    assert_eq!(err.code(), codes::CODEC_MARSHAL);
    assert_eq!(err.message(), "boom");
}

#[test]
fn deferred_codec_failure_propagates_through_the_future() {
    let endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders"),
        Arc::new(FailingDataFormat::deferred(codes::CODEC_UNMARSHAL, "late boom")),
        Operation::Unmarshal,
    );
    endpoint.start().expect("start succeeds");
    let producer = endpoint.create_producer().expect("producer");

    let outcome = producer
        .process(text_exchange("ex-5", "X#"))
        .expect("dispatch succeeds");
    match outcome {
        ProcessOutcome::Pending(future) => {
            let err = block_on(future).expect_err("deferred failure must surface");
            assert_eq!(err.code(), codes::CODEC_UNMARSHAL);
            assert_eq!(err.message(), "late boom");
        }
        other => panic!("expected pending completion, got {other:?}"),
    }
}

#[test]
fn create_consumer_always_fails_regardless_of_lifecycle() {
    // Why: 本端点在结构上不可能充当消息来源，工厂必须在任何状态下确定性
    // 失败。
    let endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders"),
        Arc::new(MarkerDataFormat::new("#")),
        Operation::Marshal,
    );

    let assert_unsupported = |endpoint: &DataFormatEndpoint| {
        let sink = endpoint.create_producer().expect("producer");
        let err: flare_core::CoreError = match endpoint.create_consumer(sink) {
            Ok(_consumer) => panic!("consumer must never be constructed"),
            Err(err) => err,
        };
        assert_eq!(err.code(), codes::ENDPOINT_UNSUPPORTED_OPERATION);
    };

    assert_unsupported(&endpoint);
    endpoint.start().expect("start succeeds");
    assert_unsupported(&endpoint);
    endpoint.stop().expect("stop succeeds");
    assert_unsupported(&endpoint);
}

#[test]
fn endpoint_reports_singleton_semantics() {
    let endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders"),
        Arc::new(MarkerDataFormat::new("#")),
        Operation::Marshal,
    );
    assert!(endpoint.is_singleton());
    assert_eq!(endpoint.uri().to_string(), "transcode://orders");
}

#[test]
fn producer_before_start_and_after_stop_reports_not_started() {
    let endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders"),
        Arc::new(MarkerDataFormat::new("#")),
        Operation::Marshal,
    );
    let producer = endpoint.create_producer().expect("producer");

    let err = producer
        .process(text_exchange("ex-6", "X"))
        .expect_err("no transform before start");
    assert_eq!(err.code(), codes::LIFECYCLE_NOT_STARTED);

    endpoint.start().expect("start succeeds");
    producer
        .process(text_exchange("ex-7", "X"))
        .expect("dispatch works while started");
    endpoint.stop().expect("stop succeeds");

    let err = producer
        .process(text_exchange("ex-8", "X"))
        .expect_err("no transform after stop");
    assert_eq!(err.code(), codes::LIFECYCLE_NOT_STARTED);
}

#[test]
fn lifecycle_starts_codec_with_wrapper_and_stops_wrapper_before_codec() {
    // How: 记录桩观察编解码器的 start/stop；包装器的状态通过诊断句柄观察。
    let recording = RecordingDataFormat::new(MarkerDataFormat::new("#"));
    let log = recording.log();
    let endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders"),
        Arc::new(recording),
        Operation::Marshal,
    );

    endpoint.start().expect("start succeeds");
    assert_eq!(*log.lock(), ["format.start"]);
    let transform = endpoint
        .active_transform()
        .expect("one wrapper is live after start");
    assert_eq!(transform.state(), ServiceState::Started);

    endpoint.stop().expect("stop succeeds");
    assert_eq!(*log.lock(), ["format.start", "format.stop"]);
    assert_eq!(transform.state(), ServiceState::Stopped);
    assert!(endpoint.active_transform().is_none());
}

#[test]
fn repeated_start_and_stop_are_observable_noops() {
    let endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders"),
        Arc::new(MarkerDataFormat::new("#")),
        Operation::Marshal,
    );
    endpoint.start().expect("first start");
    endpoint.start().expect("repeated start is a noop");
    assert_eq!(endpoint.state(), ServiceState::Started);

    endpoint.stop().expect("first stop");
    endpoint.stop().expect("repeated stop is a noop");
    assert_eq!(endpoint.state(), ServiceState::Stopped);

    let err = endpoint.start().expect_err("stopped endpoint must not restart");
    assert_eq!(err.code(), codes::LIFECYCLE_INVALID_TRANSITION);
}

#[test]
fn stop_before_start_is_a_noop() {
    let recording = RecordingDataFormat::new(MarkerDataFormat::new("#"));
    let log = recording.log();
    let endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders"),
        Arc::new(recording),
        Operation::Marshal,
    );
    endpoint.stop().expect("nothing was built, nothing to stop");
    assert_eq!(endpoint.state(), ServiceState::Created);
    assert!(log.lock().is_empty());
}

#[test]
fn unknown_operation_string_is_rejected_at_construction() {
    // Why: 未知方向是配置错误，必须在构造阶段失败，而不是落入解码分支。
    let err = DataFormatEndpoint::with_operation_str(
        endpoint_uri("orders"),
        Arc::new(MarkerDataFormat::new("#")),
        "compress",
    )
    .expect_err("unknown operation must be rejected");
    assert_eq!(err.code(), codes::ENDPOINT_INVALID_CONFIG);
    assert!(err.message().contains("compress"));
}

#[test]
fn codec_errors_do_not_reach_the_consumer_boundary() {
    // Why: `Consumer` 只是边界标记；确认错误路径不会意外构造消费者。
    let endpoint = DataFormatEndpoint::new(
        endpoint_uri("orders"),
        Arc::new(FailingDataFormat::new(codes::CODEC_MARSHAL, "boom")),
        Operation::Marshal,
    );
    let sink = endpoint.create_producer().expect("producer");
    let result: Result<Box<dyn Consumer>, _> = endpoint.create_consumer(sink);
    assert!(result.is_err());
}
