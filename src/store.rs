//! Write targets
//!
//! `KvStore` is the one operation the write loop needs. `SentinelStore`
//! implements it against whichever node the sentinels currently report for
//! the configured master set.

use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use redis::sentinel::Sentinel;

use crate::config::{ServerRole, WriterConfig};
use crate::error::{Error, Result};

/// Something that can store a string value under a key
#[allow(async_fn_in_trait)]
pub trait KvStore {
    async fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Sentinel-resolved redis connection
///
/// The connection is opened lazily and cached. Any failure drops it, so the
/// next write asks the sentinels again and follows a failover.
pub struct SentinelStore {
    sentinel: Sentinel,
    master_name: String,
    role: ServerRole,
    conn: Option<MultiplexedConnection>,
}

impl SentinelStore {
    /// Build the sentinel handle. No network I/O happens here.
    pub fn new(config: &WriterConfig) -> Result<Self> {
        config.validate().map_err(Error::Config)?;

        let urls: Vec<String> = config.sentinels.iter().map(|s| s.to_url()).collect();
        let sentinel = Sentinel::build(urls)?;

        Ok(Self {
            sentinel,
            master_name: config.master_name.clone(),
            role: config.role,
            conn: None,
        })
    }

    /// Whether a resolved connection is currently cached
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    async fn resolve(&mut self) -> Result<MultiplexedConnection> {
        let client = match self.role {
            ServerRole::Master => {
                self.sentinel
                    .async_master_for(&self.master_name, None)
                    .await?
            }
            ServerRole::Replica => {
                self.sentinel
                    .async_replica_for(&self.master_name, None)
                    .await?
            }
        };

        let conn = client.get_multiplexed_async_connection().await?;
        log::info!(
            "Connected to {} of '{}' at {:?}",
            self.role,
            self.master_name,
            client.get_connection_info().addr
        );
        Ok(conn)
    }
}

impl KvStore for SentinelStore {
    async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.resolve().await?,
        };

        conn.set::<_, _, ()>(key, value).await?;
        self.conn = Some(conn);
        Ok(())
    }
}
