use crate::dns::codec::{DecodedAnswer, MessageCodec};
use async_trait::async_trait;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::RData;
use reflector_dns_application::ports::HostResolver;
use reflector_dns_application::use_cases::ForwardQueryUseCase;
use reflector_dns_domain::{normalize_name, DomainError, MxRecord, RecordType};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// Resolves hostnames for lookup mode by sending queries built with the
/// codec through the retrying forwarder.
pub struct UpstreamHostResolver {
    forwarder: Arc<ForwardQueryUseCase>,
}

impl UpstreamHostResolver {
    pub fn new(forwarder: Arc<ForwardQueryUseCase>) -> Self {
        Self { forwarder }
    }

    async fn resolve(
        &self,
        host: &str,
        record_type: RecordType,
    ) -> Result<DecodedAnswer, DomainError> {
        let (id, query) = MessageCodec::build_query(host, record_type)?;
        let reply = self.forwarder.execute(&query).await?;
        let answer = MessageCodec::decode_answers(&reply)?;

        if answer.id != id {
            return Err(DomainError::MalformedMessage(format!(
                "reply id {} does not match query id {}",
                answer.id, id
            )));
        }

        if answer.response_code != ResponseCode::NoError {
            return Err(DomainError::LookupFailed {
                record_type: record_type.to_string(),
                reason: rcode_to_status(answer.response_code).to_string(),
            });
        }

        debug!(
            host = %host,
            record_type = %record_type,
            answers = answer.answers.len(),
            "Lookup answered"
        );
        Ok(answer)
    }
}

#[async_trait]
impl HostResolver for UpstreamHostResolver {
    async fn lookup_ips(
        &self,
        host: &str,
        record_type: RecordType,
    ) -> Result<Vec<IpAddr>, DomainError> {
        let answer = self.resolve(host, record_type).await?;

        Ok(answer
            .answers
            .iter()
            .filter_map(|record| match record.data() {
                RData::A(a) if record_type == RecordType::A => Some(IpAddr::V4(a.0)),
                RData::AAAA(aaaa) if record_type == RecordType::AAAA => Some(IpAddr::V6(aaaa.0)),
                _ => None,
            })
            .collect())
    }

    async fn lookup_mx(&self, host: &str) -> Result<Vec<MxRecord>, DomainError> {
        let answer = self.resolve(host, RecordType::MX).await?;

        Ok(answer
            .answers
            .iter()
            .filter_map(|record| match record.data() {
                RData::MX(mx) => Some(MxRecord {
                    host: mx.exchange().to_utf8(),
                    preference: mx.preference(),
                }),
                _ => None,
            })
            .collect())
    }

    async fn lookup_cname(&self, host: &str) -> Result<Option<String>, DomainError> {
        let answer = self.resolve(host, RecordType::CNAME).await?;

        // Follow the alias chain from the queried name; a name with no
        // alias is its own canonical name.
        let mut canonical = normalize_name(host);
        for _ in 0..answer.answers.len() {
            let next = answer.answers.iter().find_map(|record| match record.data() {
                RData::CNAME(target) if normalize_name(&record.name().to_utf8()) == canonical => {
                    Some(normalize_name(&target.to_utf8()))
                }
                _ => None,
            });

            match next {
                Some(target) => canonical = target,
                None => break,
            }
        }

        Ok(Some(canonical.to_string()))
    }
}

fn rcode_to_status(rcode: ResponseCode) -> &'static str {
    match rcode {
        ResponseCode::NoError => "NOERROR",
        ResponseCode::NXDomain => "NXDOMAIN",
        ResponseCode::ServFail => "SERVFAIL",
        ResponseCode::Refused => "REFUSED",
        ResponseCode::NotImp => "NOTIMP",
        ResponseCode::FormErr => "FORMERR",
        _ => "UNKNOWN",
    }
}
