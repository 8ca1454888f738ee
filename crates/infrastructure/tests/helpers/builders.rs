use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType as HickoryRecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use reflector_dns_application::ports::{CachedAnswers, UpstreamClient};
use reflector_dns_domain::DomainError;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Wire bytes of a recursive query with a fixed transaction id.
pub fn query_bytes(id: u16, name: &str, record_type: HickoryRecordType) -> Vec<u8> {
    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(Query::query(Name::from_str(name).unwrap(), record_type));

    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).unwrap();
    buf
}

pub fn a_record(name: &str, ip: Ipv4Addr) -> Record {
    Record::from_rdata(Name::from_str(name).unwrap(), 60, RData::A(A(ip)))
}

pub fn answers(records: Vec<Record>) -> CachedAnswers {
    Arc::new(records)
}

/// Upstream that always fails with a retryable error.
#[derive(Default)]
pub struct FailingUpstream {
    calls: AtomicUsize,
}

impl FailingUpstream {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamClient for FailingUpstream {
    async fn forward(&self, _query: &[u8], _timeout: Duration) -> Result<Vec<u8>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::UpstreamUnavailable("connection refused".to_string()))
    }

    fn upstream(&self) -> String {
        "failing-upstream".to_string()
    }
}

/// Upstream whose local socket is unusable. The error is not retryable.
#[derive(Default)]
pub struct BrokenSocketUpstream {
    calls: AtomicUsize,
}

impl BrokenSocketUpstream {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamClient for BrokenSocketUpstream {
    async fn forward(&self, _query: &[u8], _timeout: Duration) -> Result<Vec<u8>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::SocketFatal("socket closed".to_string()))
    }

    fn upstream(&self) -> String {
        "broken-upstream".to_string()
    }
}
