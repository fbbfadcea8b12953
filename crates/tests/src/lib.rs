//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 模拟 e2e 测试（MockTransport，无需真实邮件服务）
//! - 活动文件 → 收件人队列 → 发送 全链路

#[cfg(test)]
mod contract_tests {
    use contracts::{BatchState, Progress, RunState};

    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_idle_state_snapshot() {
        let state = BatchState::idle();
        assert_eq!((state.cursor, state.total), (0, 0));
        assert_eq!(state.run_state, RunState::Idle);
        assert_eq!(Progress::new(0, 0).percentage(), None);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::{Arc, OnceLock};
    use std::time::Duration;

    use contracts::{
        BodyEncoding, MessageTemplate, Progress, ProgressReporter, RecipientQueue, RunState,
        StatusLevel,
    };
    use dispatcher::{
        DispatchControl, DispatchController, DispatchControllerBuilder, DispatchError,
        ProgressHistory, StatusBoard, DEFAULT_BOARD_CAPACITY,
    };
    use transport::MockTransport;

    fn template() -> MessageTemplate {
        MessageTemplate {
            from_name: "Ops Team".to_string(),
            from_email: "ops@example.com".to_string(),
            reply_to: "reply@example.com".to_string(),
            subject: "Quarterly update".to_string(),
            body_encoding: BodyEncoding::Html,
            base64: false,
            body: "<p>Hello</p>".to_string(),
            body_file: None,
        }
    }

    fn addresses(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("user{i}@example.com")).collect()
    }

    struct Fixture {
        controller: DispatchController<MockTransport>,
        mock: MockTransport,
        board: StatusBoard,
        history: ProgressHistory,
    }

    impl Fixture {
        fn new(mock: MockTransport) -> Self {
            Self::with_reporter(mock, None)
        }

        fn with_reporter(mock: MockTransport, reporter: Option<Arc<dyn ProgressReporter>>) -> Self {
            let board = StatusBoard::new("board");
            let history = ProgressHistory::new("history");
            let mut builder = DispatchControllerBuilder::new(mock.clone(), template())
                .delay(Duration::from_millis(1))
                .status_log(Arc::new(board.clone()))
                .progress_reporter(Arc::new(history.clone()));
            if let Some(reporter) = reporter {
                builder = builder.progress_reporter(reporter);
            }
            Self {
                controller: builder.build(),
                mock,
                board,
                history,
            }
        }

        /// (level, message) pairs, oldest first
        fn log(&self) -> Vec<(StatusLevel, String)> {
            let mut log: Vec<_> = self
                .board
                .entries()
                .into_iter()
                .map(|e| (e.level, e.message))
                .collect();
            log.reverse();
            log
        }
    }

    /// Runs an operator action once progress reaches `at`
    struct Trigger {
        at: usize,
        control: Arc<OnceLock<DispatchControl>>,
        action: fn(&DispatchControl) -> bool,
    }

    impl ProgressReporter for Trigger {
        fn name(&self) -> &str {
            "trigger"
        }

        fn report(&self, progress: Progress) {
            if progress.current == self.at {
                if let Some(control) = self.control.get() {
                    (self.action)(control);
                }
            }
        }
    }

    fn fixture_with_trigger(at: usize, action: fn(&DispatchControl) -> bool) -> Fixture {
        let slot = Arc::new(OnceLock::new());
        let trigger = Arc::new(Trigger {
            at,
            control: Arc::clone(&slot),
            action,
        });
        let fixture = Fixture::with_reporter(MockTransport::new(), Some(trigger));
        let _ = slot.set(fixture.controller.control());
        fixture
    }

    #[tokio::test]
    async fn test_completed_batch_sends_each_recipient_once_in_order() {
        for n in 1..=6 {
            let fixture = Fixture::new(MockTransport::new());
            let addrs = addresses(n);
            let queue: RecipientQueue = addrs.iter().map(String::as_str).collect();

            let report = fixture.controller.start(queue).unwrap().join().await.unwrap();

            assert_eq!(report.final_state, RunState::Completed);
            assert_eq!(report.processed, n);
            assert_eq!(fixture.mock.recipients(), addrs);
            assert_eq!(fixture.history.last(), Some(Progress::new(n, n)));

            let percentages = fixture.history.percentages();
            assert!(percentages.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(percentages.last(), Some(&100));
        }
    }

    #[tokio::test]
    async fn test_two_recipients_always_succeeding() {
        let fixture = Fixture::new(MockTransport::new());
        let queue: RecipientQueue = ["a@x.com", "b@x.com"].into_iter().collect();
        fixture.controller.start(queue).unwrap().join().await.unwrap();

        let successes: Vec<String> = fixture
            .log()
            .into_iter()
            .filter(|(level, msg)| *level == StatusLevel::Success && msg.starts_with("Email sent"))
            .map(|(_, msg)| msg)
            .collect();
        assert_eq!(successes, vec!["Email sent to a@x.com", "Email sent to b@x.com"]);
        assert_eq!(fixture.history.percentages(), vec![50, 100]);

        let calls = fixture.mock.calls();
        assert!(calls.iter().all(|r| r.subject == "Quarterly update" && r.from_name == "Ops Team"));
    }

    #[tokio::test]
    async fn test_failure_on_first_recipient_still_completes() {
        let fixture = Fixture::new(MockTransport::new().reject("a@x.com", "Mailbox unavailable"));
        let queue: RecipientQueue = ["a@x.com", "b@x.com"].into_iter().collect();
        let report = fixture.controller.start(queue).unwrap().join().await.unwrap();

        assert_eq!(report.final_state, RunState::Completed);
        let log = fixture.log();
        assert_eq!(
            log[1],
            (
                StatusLevel::Error,
                "Failed to send to a@x.com: Mailbox unavailable".to_string()
            )
        );
        assert_eq!(log[2], (StatusLevel::Success, "Email sent to b@x.com".to_string()));
    }

    #[tokio::test]
    async fn test_every_item_failing_still_completes() {
        let mock = MockTransport::new()
            .raise("a@x.com", "connection refused")
            .raise("b@x.com", "connection refused");
        let fixture = Fixture::new(mock);
        let queue: RecipientQueue = ["a@x.com", "b@x.com"].into_iter().collect();
        let report = fixture.controller.start(queue).unwrap().join().await.unwrap();

        assert!(report.is_completed());
        assert_eq!(report.failed, 2);
        assert_eq!(report.stats.failed, 2);
        assert_eq!(report.stats.latency_ms.count, 2);
    }

    #[tokio::test]
    async fn test_malformed_address_rejects_batch() {
        let fixture = Fixture::new(MockTransport::new());
        let queue: RecipientQueue = ["a@x.com", "bad", "c@x.com"].into_iter().collect();

        let err = fixture.controller.start(queue).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidRecipients { ref invalid } if invalid == &["bad"]));
        assert!(err.to_string().contains("bad"));
        assert_eq!(fixture.mock.call_count(), 0);

        let log = fixture.log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].0, StatusLevel::Error);
        assert!(log[0].1.contains("bad"));
    }

    #[tokio::test]
    async fn test_pause_after_k_then_resume() {
        let fixture = fixture_with_trigger(2, DispatchControl::pause);
        let control = fixture.controller.control();
        let addrs = addresses(5);
        let queue: RecipientQueue = addrs.iter().map(String::as_str).collect();

        let task = fixture.controller.start(queue).unwrap();
        assert!(control.wait_for_state(RunState::Paused, Duration::from_secs(2)).await);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(fixture.mock.call_count(), 2);

        control.resume();
        let report = task.join().await.unwrap();
        assert!(report.is_completed());
        assert_eq!(fixture.mock.recipients(), addrs);
    }

    #[tokio::test]
    async fn test_cancel_after_k() {
        let fixture = fixture_with_trigger(3, DispatchControl::cancel);
        let addrs = addresses(6);
        let queue: RecipientQueue = addrs.iter().map(String::as_str).collect();

        let report = fixture.controller.start(queue).unwrap().join().await.unwrap();

        assert_eq!(report.final_state, RunState::Cancelled);
        assert_eq!(report.processed, 3);
        assert_eq!(fixture.mock.recipients(), addrs[..3].to_vec());

        let cancellations = fixture
            .log()
            .into_iter()
            .filter(|(_, msg)| msg.contains("cancelled"))
            .count();
        assert_eq!(cancellations, 1);
    }

    #[tokio::test]
    async fn test_status_board_caps_long_batches() {
        let fixture = Fixture::new(MockTransport::new());
        let addrs = addresses(DEFAULT_BOARD_CAPACITY + 5);
        let queue: RecipientQueue = addrs.iter().map(String::as_str).collect();
        fixture.controller.start(queue).unwrap().join().await.unwrap();

        let entries = fixture.board.entries();
        assert_eq!(entries.len(), DEFAULT_BOARD_CAPACITY);
        assert!(entries[0].message.starts_with("All 55 email(s) processed"));
        assert!(entries
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_controller_reusable_after_batch() {
        let fixture = Fixture::new(MockTransport::new());
        for round in 0..2 {
            let queue: RecipientQueue = [format!("r{round}@x.com")].into_iter().collect();
            let report = fixture.controller.start(queue).unwrap().join().await.unwrap();
            assert!(report.is_completed());
        }
        assert_eq!(fixture.controller.metrics().completed_batches, 2);
        assert_eq!(fixture.mock.call_count(), 2);
    }
}

#[cfg(test)]
mod campaign_tests {
    use std::sync::Arc;

    use config_loader::ConfigLoader;
    use dispatcher::{DispatchConfig, DispatchControllerBuilder, JsonLinesStatusLog};
    use transport::{AnyTransport, SendTransport};

    #[tokio::test]
    async fn test_campaign_file_to_dry_run_batch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("body.html"), "<h1>Hi</h1>").unwrap();
        std::fs::write(dir.path().join("list.txt"), "b@x.com\n\nc@x.com\n").unwrap();
        let campaign_path = dir.path().join("campaign.toml");
        std::fs::write(
            &campaign_path,
            r#"
[message]
from_name = "Ops"
from_email = "ops@example.com"
reply_to = "reply@example.com"
subject = "Grüße"
base64 = true
body_file = "body.html"

[recipients]
list = ["a@x.com"]
file = "list.txt"

[dispatch]
delay_ms = 1
"#,
        )
        .unwrap();

        let campaign = ConfigLoader::load_from_path(&campaign_path).unwrap();
        let queue = recipients::parse_sources(&campaign.recipients, campaign_path.parent()).unwrap();
        assert!(recipients::invalid_recipients(&queue).is_empty());

        let transport = AnyTransport::from_config(&campaign.transport).unwrap();
        assert_eq!(transport.name(), "dry_run");

        let status_path = dir.path().join("status.jsonl");
        let controller = DispatchControllerBuilder::new(transport, campaign.message.clone())
            .config(DispatchConfig::from(&campaign.dispatch))
            .status_log(Arc::new(JsonLinesStatusLog::open("file", &status_path).unwrap()))
            .build();

        let report = controller.start(queue).unwrap().join().await.unwrap();
        assert!(report.is_completed());
        assert_eq!((report.succeeded, report.failed), (3, 0));

        let lines = std::fs::read_to_string(&status_path).unwrap();
        assert_eq!(lines.lines().count(), 5);
        assert!(lines.contains("Email sent to c@x.com"));
    }
}
