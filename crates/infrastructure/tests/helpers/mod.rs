#![allow(dead_code)]

mod builders;
mod dns_server_mock;

pub use builders::{a_record, answers, query_bytes, BrokenSocketUpstream, FailingUpstream};
pub use dns_server_mock::{MockDnsServer, MockMode};
