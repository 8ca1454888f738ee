//! Connectivity check for a Redis-compatible key/value store.
//!
//! Speaks just enough RESP to authenticate, select the database and ping.

use async_trait::async_trait;
use reflector_dns_application::ports::CacheBackend;
use reflector_dns_domain::config::PersistentCacheConfig;
use reflector_dns_domain::DomainError;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

pub struct RedisProbe {
    address: String,
    password: Option<String>,
    db: u32,
    timeout: Duration,
}

impl RedisProbe {
    pub fn new(
        address: impl Into<String>,
        password: Option<String>,
        db: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            address: address.into(),
            password,
            db,
            timeout,
        }
    }

    pub fn from_config(config: &PersistentCacheConfig) -> Self {
        Self::new(
            config.address.clone(),
            config.password().map(str::to_string),
            config.db,
            config.timeout(),
        )
    }

    async fn exchange(&self) -> Result<(), DomainError> {
        let stream = TcpStream::connect(&self.address)
            .await
            .map_err(|e| DomainError::CacheBackend(format!("connect: {}", e)))?;
        let mut stream = BufReader::new(stream);

        if let Some(password) = &self.password {
            Self::command(&mut stream, &["AUTH", password], "+OK").await?;
        }
        if self.db != 0 {
            let db = self.db.to_string();
            Self::command(&mut stream, &["SELECT", &db], "+OK").await?;
        }
        Self::command(&mut stream, &["PING"], "+PONG").await
    }

    async fn command(
        stream: &mut BufReader<TcpStream>,
        args: &[&str],
        expected: &str,
    ) -> Result<(), DomainError> {
        let verb = args.first().copied().unwrap_or_default();

        stream
            .get_mut()
            .write_all(&encode_command(args))
            .await
            .map_err(|e| DomainError::CacheBackend(format!("{}: {}", verb, e)))?;

        let mut line = String::new();
        let read = stream
            .read_line(&mut line)
            .await
            .map_err(|e| DomainError::CacheBackend(format!("{}: {}", verb, e)))?;
        if read == 0 {
            return Err(DomainError::CacheBackend(format!(
                "{}: connection closed",
                verb
            )));
        }

        let reply = line.trim_end();
        if reply != expected {
            return Err(DomainError::CacheBackend(format!(
                "{}: unexpected reply '{}'",
                verb, reply
            )));
        }

        debug!(command = verb, "Backend replied");
        Ok(())
    }
}

fn encode_command(args: &[&str]) -> Vec<u8> {
    let mut out = format!("*{}\r\n", args.len()).into_bytes();
    for arg in args {
        out.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        out.extend_from_slice(arg.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out
}

#[async_trait]
impl CacheBackend for RedisProbe {
    async fn ping(&self) -> Result<(), DomainError> {
        tokio::time::timeout(self.timeout, self.exchange())
            .await
            .map_err(|_| {
                DomainError::CacheBackend(format!("timed out after {:?}", self.timeout))
            })?
    }

    fn describe(&self) -> String {
        format!("redis://{}/{}", self.address, self.db)
    }
}
