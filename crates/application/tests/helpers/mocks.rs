use async_trait::async_trait;
use reflector_dns_application::ports::{CacheBackend, HostResolver, UpstreamClient};
use reflector_dns_domain::{DomainError, MxRecord, RecordType};
use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Upstream stub that replays scripted outcomes, then falls back to a default.
pub struct MockUpstreamClient {
    script: Mutex<VecDeque<Result<Vec<u8>, DomainError>>>,
    fallback: Result<Vec<u8>, DomainError>,
    calls: AtomicUsize,
}

impl MockUpstreamClient {
    pub fn answering(reply: Vec<u8>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(reply),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: DomainError) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn then(self, outcome: Result<Vec<u8>, DomainError>) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamClient for MockUpstreamClient {
    async fn forward(&self, _query: &[u8], _timeout: Duration) -> Result<Vec<u8>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| self.fallback.clone())
    }

    fn upstream(&self) -> String {
        "mock-upstream".to_string()
    }
}

#[derive(Default)]
pub struct MockHostResolver {
    ips: Mutex<HashMap<(String, RecordType), Vec<IpAddr>>>,
    mx: Mutex<HashMap<String, Vec<MxRecord>>>,
    cnames: Mutex<HashMap<String, String>>,
    failing_hosts: Mutex<Vec<String>>,
}

impl MockHostResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ips(&self, host: &str, record_type: RecordType, ips: &[&str]) {
        let parsed = ips.iter().map(|ip| ip.parse().unwrap()).collect();
        self.ips
            .lock()
            .unwrap()
            .insert((host.to_string(), record_type), parsed);
    }

    pub fn set_mx(&self, host: &str, records: Vec<MxRecord>) {
        self.mx.lock().unwrap().insert(host.to_string(), records);
    }

    pub fn set_cname(&self, host: &str, cname: &str) {
        self.cnames
            .lock()
            .unwrap()
            .insert(host.to_string(), cname.to_string());
    }

    pub fn fail_host(&self, host: &str) {
        self.failing_hosts.lock().unwrap().push(host.to_string());
    }

    fn check(&self, host: &str) -> Result<(), DomainError> {
        if self.failing_hosts.lock().unwrap().iter().any(|h| h == host) {
            return Err(DomainError::UpstreamTimeout {
                server: "mock".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl HostResolver for MockHostResolver {
    async fn lookup_ips(
        &self,
        host: &str,
        record_type: RecordType,
    ) -> Result<Vec<IpAddr>, DomainError> {
        self.check(host)?;
        Ok(self
            .ips
            .lock()
            .unwrap()
            .get(&(host.to_string(), record_type))
            .cloned()
            .unwrap_or_default())
    }

    async fn lookup_mx(&self, host: &str) -> Result<Vec<MxRecord>, DomainError> {
        self.check(host)?;
        Ok(self.mx.lock().unwrap().get(host).cloned().unwrap_or_default())
    }

    async fn lookup_cname(&self, host: &str) -> Result<Option<String>, DomainError> {
        self.check(host)?;
        Ok(self.cnames.lock().unwrap().get(host).cloned())
    }
}

pub struct MockCacheBackend {
    reachable: bool,
    pings: AtomicUsize,
}

impl MockCacheBackend {
    pub fn reachable() -> Self {
        Self {
            reachable: true,
            pings: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            pings: AtomicUsize::new(0),
        }
    }

    pub fn ping_count(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheBackend for MockCacheBackend {
    async fn ping(&self) -> Result<(), DomainError> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if self.reachable {
            Ok(())
        } else {
            Err(DomainError::CacheBackend("connection refused".to_string()))
        }
    }

    fn describe(&self) -> String {
        "mock://backend".to_string()
    }
}
