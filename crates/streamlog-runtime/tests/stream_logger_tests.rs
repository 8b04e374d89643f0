//! End-to-end tests for forwarding process output into a log sink.
//!
//! Streams are driven through `tokio::io::duplex` pipes (the writer half
//! plays the child process) or scripted `tokio_test` readers when a read
//! error has to be injected.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use mockall::Sequence;
use mockall::predicate::eq;
use streamlog_core::MockLogSinkPort;
use streamlog_runtime::{
    LogSinkPort, MemoryLogSink, StreamLogError, StreamLogger, StreamLoggerConfig,
    TracingLogSink, begin_logging,
};
use tokio::io::{AsyncWriteExt, DuplexStream, duplex};
use tokio::time::{sleep, timeout};
use tokio_test::io::Builder;

const WAIT: Duration = Duration::from_secs(5);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Poll the sink until it holds `count` lines or the wait window closes.
async fn wait_for_lines(sink: &MemoryLogSink, count: usize) -> Vec<String> {
    timeout(WAIT, async {
        while sink.len() < count {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("sink received {} of {count} lines", sink.len()));
    sink.messages()
}

async fn write_numbered_lines(writer: &mut DuplexStream, count: usize) {
    for i in 0..count {
        writer.write_all(format!("{i}\n").as_bytes()).await.unwrap();
    }
}

#[tokio::test]
async fn test_lines_are_logged_while_stream_stays_open() {
    init_tracing();
    let sink = Arc::new(MemoryLogSink::new());
    let (mut writer, reader) = duplex(64);
    let mut process = Some(reader);

    let signal = begin_logging(&mut process, sink.clone());
    let producer = tokio::spawn(async move {
        write_numbered_lines(&mut writer, 5).await;
        writer
    });

    assert_eq!(wait_for_lines(&sink, 5).await, vec!["0", "1", "2", "3", "4"]);
    assert!(signal.wait_timeout(Duration::from_millis(100)).await.is_none());
    assert!(signal.is_pending());

    // Writer still open: nothing further arrives and nothing resolves.
    let _writer = producer.await.unwrap();
    assert_eq!(sink.len(), 5);
    assert!(signal.is_pending());
}

#[tokio::test]
async fn test_signal_resolves_true_at_end_of_stream() {
    init_tracing();
    let sink = Arc::new(MemoryLogSink::new());
    let (mut writer, reader) = duplex(64);
    let mut process = Some(reader);

    let signal = begin_logging(&mut process, sink.clone());
    tokio::spawn(async move {
        write_numbered_lines(&mut writer, 5).await;
        drop(writer);
    });

    assert!(matches!(signal.wait_timeout(WAIT).await, Some(Ok(true))));
    assert_eq!(sink.messages(), vec!["0", "1", "2", "3", "4"]);
    assert!(matches!(signal.peek(), Some(Ok(true))));
}

#[tokio::test]
async fn test_read_error_fails_signal_after_forwarded_lines() {
    init_tracing();
    let sink = Arc::new(MemoryLogSink::new());
    let stream = Builder::new()
        .read(b"a\n")
        .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"))
        .build();
    let mut process = Some(stream);

    let signal = begin_logging(&mut process, sink.clone());

    let err = signal.wait_timeout(WAIT).await.unwrap().unwrap_err();
    assert_eq!(err.io_kind(), Some(io::ErrorKind::ConnectionReset));
    assert_eq!(sink.messages(), vec!["a"]);

    sleep(Duration::from_millis(50)).await;
    assert_eq!(sink.messages(), vec!["a"]);
    // Repeated queries keep reporting the same cause.
    for _ in 0..3 {
        let again = signal.wait().await.unwrap_err();
        assert_eq!(again.io_kind(), Some(io::ErrorKind::ConnectionReset));
    }
}

#[tokio::test]
async fn test_sink_calls_follow_stream_order() {
    let mut mock = MockLogSinkPort::new();
    let mut seq = Sequence::new();
    for i in 0..5 {
        mock.expect_info()
            .with(eq(i.to_string()))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
    }
    let sink: Arc<dyn LogSinkPort> = Arc::new(mock);

    let signal = StreamLogger::new(sink).begin_logging_stream(&b"0\n1\n2\n3\n4\n"[..]);

    assert!(matches!(signal.wait_timeout(WAIT).await, Some(Ok(true))));
}

#[tokio::test]
async fn test_trailing_fragment_is_dropped_at_end_of_stream() {
    let mut mock = MockLogSinkPort::new();
    mock.expect_info()
        .with(eq("complete".to_string()))
        .times(1)
        .return_const(());
    let sink: Arc<dyn LogSinkPort> = Arc::new(mock);

    let signal = StreamLogger::new(sink).begin_logging_stream(&b"complete\nincompl"[..]);

    assert!(matches!(signal.wait_timeout(WAIT).await, Some(Ok(true))));
}

#[tokio::test]
async fn test_decode_error_fails_without_forwarding_bad_line() {
    let sink = Arc::new(MemoryLogSink::new());
    let logger = StreamLogger::new(sink.clone());

    let signal = logger.begin_logging_stream(&b"fine\n\xc3\x28\nunreached\n"[..]);

    match signal.wait_timeout(WAIT).await {
        Some(Err(StreamLogError::Decode { line, .. })) => assert_eq!(line, 2),
        other => panic!("expected decode failure, got {other:?}"),
    }
    assert_eq!(sink.messages(), vec!["fine"]);
}

#[tokio::test]
async fn test_panicking_sink_aborts_invocation() {
    let mut mock = MockLogSinkPort::new();
    mock.expect_info()
        .returning(|_| panic!("sink unavailable"));
    let sink: Arc<dyn LogSinkPort> = Arc::new(mock);

    let signal = StreamLogger::new(sink).begin_logging_stream(&b"boom\n"[..]);

    assert!(matches!(
        signal.wait_timeout(WAIT).await,
        Some(Err(StreamLogError::Aborted))
    ));
}

#[tokio::test]
async fn test_independent_invocations_share_nothing() {
    let first = Arc::new(MemoryLogSink::new());
    let second = Arc::new(MemoryLogSink::new());
    let (mut writer_a, reader_a) = duplex(16);
    let (mut writer_b, reader_b) = duplex(16);

    let signal_a = begin_logging(&mut Some(reader_a), first.clone());
    let signal_b = begin_logging(&mut Some(reader_b), second.clone());

    let a = tokio::spawn(async move {
        for i in 0..200 {
            writer_a.write_all(format!("a{i}\n").as_bytes()).await.unwrap();
        }
    });
    let b = tokio::spawn(async move {
        for i in 0..200 {
            writer_b.write_all(format!("b{i}\n").as_bytes()).await.unwrap();
        }
    });
    a.await.unwrap();
    b.await.unwrap();

    assert!(matches!(signal_a.wait_timeout(WAIT).await, Some(Ok(true))));
    assert!(matches!(signal_b.wait_timeout(WAIT).await, Some(Ok(true))));

    let expected_a: Vec<String> = (0..200).map(|i| format!("a{i}")).collect();
    let expected_b: Vec<String> = (0..200).map(|i| format!("b{i}")).collect();
    assert_eq!(first.messages(), expected_a);
    assert_eq!(second.messages(), expected_b);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shared_sink_keeps_per_stream_order() {
    let sink = Arc::new(MemoryLogSink::new());
    let logger = StreamLogger::new(sink.clone());

    let signals: Vec<_> = ["x", "y"]
        .into_iter()
        .map(|prefix| {
            let (mut writer, reader) = duplex(32);
            tokio::spawn(async move {
                for i in 0..100 {
                    writer
                        .write_all(format!("{prefix}{i}\n").as_bytes())
                        .await
                        .unwrap();
                }
            });
            logger.begin_logging_stream(reader)
        })
        .collect();

    for signal in signals {
        assert!(matches!(signal.wait_timeout(WAIT).await, Some(Ok(true))));
    }

    let messages = sink.messages();
    assert_eq!(messages.len(), 200);
    for prefix in ["x", "y"] {
        let ordered: Vec<String> = messages
            .iter()
            .filter(|m| m.starts_with(prefix))
            .cloned()
            .collect();
        let expected: Vec<String> = (0..100).map(|i| format!("{prefix}{i}")).collect();
        assert_eq!(ordered, expected);
    }
}

#[tokio::test]
async fn test_tracing_sink_accepts_lines() {
    init_tracing();
    let sink: Arc<dyn LogSinkPort> = Arc::new(TracingLogSink::new("tracing-test"));
    let logger = StreamLogger::with_config(sink, StreamLoggerConfig::new("tracing-test"));

    let signal = logger.begin_logging_stream(&b"hello\nworld\n"[..]);

    assert!(matches!(signal.wait_timeout(WAIT).await, Some(Ok(true))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_child_process_output_is_logged() {
    use std::process::Stdio;
    use tokio::process::Command;

    let sink = Arc::new(MemoryLogSink::new());
    let mut child = Command::new("sh")
        .arg("-c")
        .arg("echo started; echo 'from stderr' 1>&2; echo finished")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let signal = begin_logging(&mut child, sink.clone());

    assert!(matches!(signal.wait_timeout(WAIT).await, Some(Ok(true))));
    assert_eq!(sink.messages(), vec!["started", "finished"]);
    child.wait().await.unwrap();

    // The stream has been taken; a second invocation has nothing to read.
    let again = begin_logging(&mut child, sink.clone());
    assert!(matches!(again.peek(), Some(Err(StreamLogError::OutputUnavailable))));
}
