//! Counter store primitives and report initialization.
//!
//! The memory backend runs unconditionally. The redis tests are `#[ignore]`d
//! and expect a server at `REDIS_HOST`/`REDIS_PORT` (default localhost:6379):
//! `cargo test -p reporting-service -- --ignored`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use reporting_core::protocol::{TicketEvent, CLOSED_TICKETS_KEY, OPEN_TICKETS_KEY};
use reporting_service::obs::ReportMetrics;
use reporting_service::reports::Reports;
use reporting_service::store::{CounterStore, MemoryStore, RedisStore};

async fn exercise_primitives(store: &dyn CounterStore, prefix: &str) {
    let a = format!("{prefix}:a");
    let b = format!("{prefix}:b");

    store.ping().await.unwrap();

    assert!(store.set_if_absent(&a, 0).await.unwrap());
    assert!(!store.set_if_absent(&a, 99).await.unwrap());
    assert_eq!(store.get_many(&[a.as_str(), b.as_str()]).await.unwrap(), vec![Some(0), None]);
    assert_eq!(store.get_many(&[a.as_str()]).await.unwrap(), vec![Some(0)]);

    assert_eq!(store.incr_by(&a, 1).await.unwrap(), 1);
    assert_eq!(store.incr_by(&a, 2).await.unwrap(), 3);

    let t = store.transfer(&a, &b).await.unwrap();
    assert_eq!((t.source, t.target, t.floored), (2, 1, false));

    store.incr_by(&a, -2).await.unwrap();
    let t = store.transfer(&a, &b).await.unwrap();
    assert_eq!((t.source, t.target, t.floored), (0, 2, true));

    assert_eq!(store.get_many(&[a.as_str(), b.as_str()]).await.unwrap(), vec![Some(0), Some(2)]);
}

fn reports_over(store: Arc<dyn CounterStore>) -> Reports {
    Reports::new(store, Arc::new(ReportMetrics::default()))
}

#[tokio::test]
async fn memory_store_primitives() {
    let store = MemoryStore::new();
    exercise_primitives(&store, "test").await;
}

#[tokio::test]
async fn init_counters_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let reports = reports_over(store.clone());

    reports.init_counters().await.unwrap();
    assert_eq!(store.value(OPEN_TICKETS_KEY).await, Some(0));
    assert_eq!(store.value(CLOSED_TICKETS_KEY).await, Some(0));

    reports.apply(TicketEvent::Created).await.unwrap();
    reports.apply(TicketEvent::Created).await.unwrap();
    reports.apply(TicketEvent::Closed).await.unwrap();

    reports.init_counters().await.unwrap();
    let s = reports.summary().await.unwrap();
    assert_eq!((s.open_tickets, s.closed_tickets, s.total_tickets), (1, 1, 2));
}

#[tokio::test]
async fn init_counters_keeps_preexisting_values() {
    let store = Arc::new(MemoryStore::new());
    store.set(OPEN_TICKETS_KEY, 7).await;

    reports_over(store.clone()).init_counters().await.unwrap();

    assert_eq!(store.value(OPEN_TICKETS_KEY).await, Some(7));
    assert_eq!(store.value(CLOSED_TICKETS_KEY).await, Some(0));
}

async fn redis_store() -> RedisStore {
    let host = std::env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".into());
    let port = std::env::var("REDIS_PORT").unwrap_or_else(|_| "6379".into());
    RedisStore::connect(
        &format!("redis://{host}:{port}/0"),
        Duration::from_secs(2),
        Duration::from_secs(1),
    )
    .await
    .expect("redis must be reachable for ignored tests")
}

fn unique_prefix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("reporting-test:{}:{nanos}", std::process::id())
}

#[tokio::test]
#[ignore = "needs a running redis"]
async fn redis_store_primitives() {
    let store = redis_store().await;
    exercise_primitives(&store, &unique_prefix()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "needs a running redis"]
async fn redis_concurrent_increments_are_atomic() {
    const N: i64 = 100;
    let store = Arc::new(redis_store().await);
    let key = format!("{}:open", unique_prefix());

    let tasks = (0..N).map(|_| {
        let store = Arc::clone(&store);
        let key = key.clone();
        tokio::spawn(async move { store.incr_by(&key, 1).await.unwrap() })
    });
    futures_util::future::join_all(tasks).await;

    assert_eq!(store.get_many(&[key.as_str()]).await.unwrap(), vec![Some(N)]);
}

#[tokio::test]
async fn connect_to_unreachable_redis_is_store_unavailable() {
    // Port 1 on loopback is not a redis server; the connect fails or times out.
    let err = match RedisStore::connect(
        "redis://127.0.0.1:1/0",
        Duration::from_millis(300),
        Duration::from_millis(100),
    )
    .await
    {
        Ok(_) => panic!("connect must fail"),
        Err(e) => e,
    };
    assert_eq!(err.client_code().as_str(), "STORE_UNAVAILABLE");
}

/// Read one RESP command (array of bulk strings). `None` on EOF.
async fn read_command<R>(r: &mut BufReader<R>) -> Option<Vec<String>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut line = String::new();
    if r.read_line(&mut line).await.ok()? == 0 {
        return None;
    }
    let n: usize = line.trim().strip_prefix('*')?.parse().ok()?;
    let mut args = Vec::with_capacity(n);
    for _ in 0..n {
        line.clear();
        r.read_line(&mut line).await.ok()?;
        let len: usize = line.trim().strip_prefix('$')?.parse().ok()?;
        let mut data = vec![0u8; len + 2];
        r.read_exact(&mut data).await.ok()?;
        data.truncate(len);
        args.push(String::from_utf8(data).ok()?);
    }
    Some(args)
}

/// Minimal RESP server: answers PING and INCRBY, acks anything else, and
/// hangs up on the first client right after its first PING.
async fn flaky_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::new(AtomicI64::new(0));

    let seen = accepted.clone();
    tokio::spawn(async move {
        loop {
            let Ok((sock, _)) = listener.accept().await else { return };
            let first = seen.fetch_add(1, Ordering::SeqCst) == 0;
            let counter = counter.clone();
            tokio::spawn(async move {
                let (rd, mut wr) = sock.into_split();
                let mut rd = BufReader::new(rd);
                while let Some(args) = read_command(&mut rd).await {
                    let cmd = args.first().map(|c| c.to_ascii_uppercase()).unwrap_or_default();
                    let reply = match cmd.as_str() {
                        "PING" => "+PONG\r\n".to_string(),
                        "INCRBY" => {
                            let delta: i64 = args[2].parse().unwrap();
                            let v = counter.fetch_add(delta, Ordering::SeqCst) + delta;
                            format!(":{v}\r\n")
                        }
                        _ => "+OK\r\n".to_string(),
                    };
                    if wr.write_all(reply.as_bytes()).await.is_err() {
                        return;
                    }
                    if first && cmd == "PING" {
                        return;
                    }
                }
            });
        }
    });
    (format!("redis://{addr}/0"), accepted)
}

#[tokio::test]
async fn redis_store_recovers_after_connection_drop() {
    let (url, accepted) = flaky_server().await;
    let store = RedisStore::connect(&url, Duration::from_secs(1), Duration::from_millis(500))
        .await
        .unwrap();
    store.ping().await.unwrap();

    let mut recovered = None;
    for _ in 0..30 {
        if let Ok(v) = store.incr_by("k", 1).await {
            recovered = Some(v);
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(recovered, Some(1));
    assert!(accepted.load(Ordering::SeqCst) >= 2);

    // Later ops keep going over the new socket.
    assert_eq!(store.incr_by("k", 1).await.unwrap(), 2);
}
