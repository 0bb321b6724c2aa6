//! Redis-backed counter store.
//!
//! All requests share one `ConnectionManager`, which redials after the socket
//! drops: the call that hits the dead connection fails, later calls go through
//! once the new connection is up. Single-key primitives map to
//! `SETNX`/`MGET`/`INCRBY`; the two-key `transfer` runs as a Lua script so
//! both counters change in one atomic step.

use std::future::Future;
use std::time::Duration;

use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, Client, RedisResult, Script};
use async_trait::async_trait;
use tokio::time::timeout;

use reporting_core::error::{Result, ReportError};

use super::{CounterStore, Transfer};

// KEYS[1] = source, KEYS[2] = target. Returns {source, target, floored}.
const TRANSFER_LUA: &str = r#"
local source = tonumber(redis.call('GET', KEYS[1]) or '0')
local floored = 1
if source > 0 then
  source = redis.call('DECR', KEYS[1])
  floored = 0
end
local target = redis.call('INCR', KEYS[2])
return {source, target, floored}
"#;

pub struct RedisStore {
    conn: ConnectionManager,
    op_timeout: Duration,
    transfer: Script,
}

impl RedisStore {
    pub async fn connect(
        url: &str,
        connect_timeout: Duration,
        op_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::open(url)
            .map_err(|e| ReportError::StoreUnavailable(format!("invalid redis url {url}: {e}")))?;

        let conn = match timeout(connect_timeout, ConnectionManager::new(client)).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => {
                return Err(ReportError::StoreUnavailable(format!("connect {url} failed: {e}")))
            }
            Err(_) => {
                return Err(ReportError::StoreUnavailable(format!(
                    "connect {url} timed out after {connect_timeout:?}"
                )))
            }
        };

        Ok(Self {
            conn,
            op_timeout,
            transfer: Script::new(TRANSFER_LUA),
        })
    }

    /// Bound a redis call by the op timeout and map failures to `StoreUnavailable`.
    async fn run<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = RedisResult<T>> + Send,
    {
        match timeout(self.op_timeout, fut).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => Err(ReportError::StoreUnavailable(format!("redis {op} failed: {e}"))),
            Err(_) => Err(ReportError::StoreUnavailable(format!(
                "redis {op} timed out after {:?}",
                self.op_timeout
            ))),
        }
    }
}

#[async_trait]
impl CounterStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _pong: String = self
            .run("ping", ::redis::cmd("PING").query_async(&mut conn))
            .await?;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: i64) -> Result<bool> {
        let mut conn = self.conn.clone();
        self.run("setnx", conn.set_nx::<_, _, bool>(key, value)).await
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<i64>>> {
        // MGET without keys is a server-side arity error.
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        self.run("mget", conn.mget::<_, Vec<Option<i64>>>(keys)).await
    }

    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        let mut conn = self.conn.clone();
        self.run("incrby", conn.incr::<_, _, i64>(key, delta)).await
    }

    async fn transfer(&self, from: &str, to: &str) -> Result<Transfer> {
        let mut conn = self.conn.clone();
        let mut invocation = self.transfer.prepare_invoke();
        invocation.key(from).key(to);

        let (source, target, floored): (i64, i64, i64) = self
            .run("transfer", invocation.invoke_async(&mut conn))
            .await?;

        Ok(Transfer {
            source,
            target,
            floored: floored != 0,
        })
    }
}
