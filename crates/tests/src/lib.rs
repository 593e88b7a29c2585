//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 配置 → Dispatcher → HTTP sink 全链路
//! - 批次计数、解码失败与致命错误传播
//! - 模拟 HTTP 服务器 (mockito)，无需真实端点

#[cfg(test)]
mod contract_tests {
    use contracts::{BatchSummary, RawMessage, Record};

    #[test]
    fn test_wire_body_reproduces_record() {
        let original = Record::new("42", "hello \"world\"");
        let wire = original.to_wire().unwrap();
        let body = String::from_utf8(wire).unwrap();
        let decoded = Record::decode(&RawMessage::new(body), 0).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(BatchSummary::new(5).to_string(), "Processed 5 messages.");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{DeliveryError, RawMessage, RelayConfig};
    use dispatcher::{create_dispatcher, DispatcherBuilder, FatalHandler, HttpSink};
    use mockito::Matcher;
    use serde_json::json;

    /// Counts escalations and panics inside the task instead of exiting
    #[derive(Default)]
    struct CountingFatal {
        escalations: AtomicUsize,
    }

    impl FatalHandler for CountingFatal {
        fn escalate(&self, error: DeliveryError) -> ! {
            self.escalations.fetch_add(1, Ordering::SeqCst);
            panic!("fatal: {error}");
        }
    }

    fn config_for(endpoint: &str) -> RelayConfig {
        let toml = format!("[sink]\nname = \"intercom\"\nendpoint = \"{endpoint}\"\n");
        ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap()
    }

    fn record_body(i: usize) -> String {
        json!({ "id": i.to_string(), "title": format!("title-{i}") }).to_string()
    }

    /// Two records, two POSTs, one summary
    #[tokio::test]
    async fn test_e2e_two_messages() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"id": "1", "title": "a"})))
            .with_status(200)
            .with_body("ok-1")
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"id": "2", "title": "b"})))
            .with_status(200)
            .with_body("ok-2")
            .expect(1)
            .create_async()
            .await;

        let dispatcher = create_dispatcher(&config_for(&format!("{}/hook", server.url()))).unwrap();
        let batch = vec![
            RawMessage::new(r#"{"id":"1","title":"a"}"#),
            RawMessage::new(r#"{"id":"2","title":"b"}"#),
        ];

        let summary = dispatcher.dispatch(&batch).await.unwrap();
        assert_eq!(summary.to_string(), "Processed 2 messages.");

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(dispatcher.metrics().delivered_count, 2);
    }

    /// processed == N for any N, one POST each
    #[tokio::test]
    async fn test_e2e_count_matches_batch_size() {
        for n in [0usize, 1, 7, 40] {
            let mut server = mockito::Server::new_async().await;
            let mock = server
                .mock("POST", "/")
                .with_status(202)
                .expect(n)
                .create_async()
                .await;

            let dispatcher = create_dispatcher(&config_for(&server.url())).unwrap();
            let batch: Vec<RawMessage> = (0..n).map(|i| RawMessage::new(record_body(i))).collect();

            let summary = dispatcher.dispatch(&batch).await.unwrap();
            assert_eq!(summary.processed, n);
            mock.assert_async().await;
        }
    }

    /// Decode failure at position k aborts the batch
    #[tokio::test]
    async fn test_e2e_decode_failure_reports_index() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .expect_at_most(1)
            .create_async()
            .await;

        let config = config_for(&server.url());
        let dispatcher = DispatcherBuilder::new(HttpSink::from_settings(&config.sink).unwrap())
            .fatal_handler(CountingFatal::default())
            .build()
            .unwrap();
        let batch = vec![
            RawMessage::new(r#"{"id":"1","title":"a"}"#),
            RawMessage::new("not-json").with_message_id("second"),
            RawMessage::new(r#"{"id":"3","title":"c"}"#),
        ];

        let err = dispatcher.dispatch(&batch).await.unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.message_id.as_deref(), Some("second"));
        assert!(err.to_string().contains("index 1"));

        let metrics = dispatcher.metrics();
        assert_eq!(metrics.decoded_count, 1);
        assert_eq!(metrics.decode_failure_count, 1);
    }

    /// Every record reaches the sink with its id and title intact
    #[tokio::test]
    async fn test_e2e_bodies_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let mut mocks = Vec::new();
        for i in 0..5 {
            let mock = server
                .mock("POST", "/")
                .match_body(Matcher::Json(
                    json!({ "id": i.to_string(), "title": format!("title-{i}") }),
                ))
                .with_status(200)
                .expect(1)
                .create_async()
                .await;
            mocks.push(mock);
        }

        let dispatcher = create_dispatcher(&config_for(&server.url())).unwrap();
        let batch: Vec<RawMessage> = (0..5).map(|i| RawMessage::new(record_body(i))).collect();
        dispatcher.dispatch(&batch).await.unwrap();

        for mock in mocks {
            mock.assert_async().await;
        }
    }

    /// Non-2xx answers are logged, not escalated
    #[tokio::test]
    async fn test_e2e_error_status_still_counts() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(500)
            .with_body("upstream down")
            .expect(3)
            .create_async()
            .await;

        let config = config_for(&server.url());
        let sink = HttpSink::from_settings(&config.sink).unwrap();
        let dispatcher = DispatcherBuilder::new(sink)
            .fatal_handler(CountingFatal::default())
            .build()
            .unwrap();

        let batch: Vec<RawMessage> = (0..3).map(|i| RawMessage::new(record_body(i))).collect();
        let summary = dispatcher.dispatch(&batch).await.unwrap();

        assert_eq!(summary.processed, 3);
        let metrics = dispatcher.metrics();
        assert_eq!(metrics.rejected_count, 3);
        assert_eq!(metrics.delivered_count, 0);
        assert_eq!(metrics.failure_count, 0);
    }

    /// Transport failures escalate once per task and the batch still drains
    #[tokio::test]
    async fn test_e2e_unreachable_sink_escalates() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let config = config_for(&format!("http://127.0.0.1:{port}/"));
        let sink = HttpSink::from_settings(&config.sink).unwrap();
        let dispatcher = DispatcherBuilder::new(sink)
            .fatal_handler(CountingFatal::default())
            .build()
            .unwrap();

        let batch: Vec<RawMessage> = (0..4).map(|i| RawMessage::new(record_body(i))).collect();
        let summary = dispatcher.dispatch(&batch).await.unwrap();

        // The count reflects decoding, not delivery
        assert_eq!(summary.processed, 4);
        let metrics = dispatcher.metrics();
        assert_eq!(metrics.failure_count, 4);
        assert_eq!(metrics.in_flight, 0);
    }

    /// Admission control keeps all-tasks-complete semantics
    #[tokio::test]
    async fn test_e2e_bounded_fan_out() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .expect(25)
            .create_async()
            .await;

        let mut config = config_for(&server.url());
        config.dispatch.max_in_flight = Some(3);
        ConfigLoader::validate(&config).unwrap();

        let dispatcher = create_dispatcher(&config).unwrap();
        let batch: Vec<RawMessage> = (0..25).map(|i| RawMessage::new(record_body(i))).collect();

        let summary = dispatcher.dispatch(&batch).await.unwrap();
        assert_eq!(summary.processed, 25);
        mock.assert_async().await;
    }

    /// One dispatcher serves consecutive batches
    #[tokio::test]
    async fn test_e2e_dispatcher_reused_across_batches() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .expect(6)
            .create_async()
            .await;

        let dispatcher = create_dispatcher(&config_for(&server.url())).unwrap();
        for _ in 0..3 {
            let batch: Vec<RawMessage> = (0..2).map(|i| RawMessage::new(record_body(i))).collect();
            dispatcher.dispatch(&batch).await.unwrap();
        }

        let metrics = dispatcher.metrics();
        assert_eq!(metrics.batch_count, 3);
        assert_eq!(metrics.delivered_count, 6);
        assert_eq!(metrics.in_flight, 0);
    }
}
