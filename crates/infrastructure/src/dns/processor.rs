use super::codec::MessageCodec;
use reflector_dns_application::ports::AnswerCache;
use reflector_dns_application::use_cases::ForwardQueryUseCase;
use reflector_dns_domain::DomainError;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// The per-packet pipeline: decode, answer from cache, or forward upstream,
/// relay the reply and populate the cache.
pub struct QueryProcessor {
    cache: Arc<dyn AnswerCache>,
    forwarder: Arc<ForwardQueryUseCase>,
}

impl QueryProcessor {
    pub fn new(cache: Arc<dyn AnswerCache>, forwarder: Arc<ForwardQueryUseCase>) -> Self {
        Self { cache, forwarder }
    }

    /// Returns the reply to send, or `None` when the packet is dropped.
    /// Failures never escape: each one is logged and confined to this packet.
    pub async fn process(&self, packet: &[u8]) -> Option<Vec<u8>> {
        match self.try_process(packet).await {
            Ok(reply) => Some(reply),
            Err(e @ (DomainError::MalformedMessage(_) | DomainError::EmptyQuestion)) => {
                debug!(error = %e, size = packet.len(), "Dropping malformed packet");
                None
            }
            // Already reported by the forwarder.
            Err(e @ DomainError::UpstreamExhausted { .. }) => {
                debug!(error = %e, "Dropping query, no reply sent");
                None
            }
            Err(e) if e.is_per_packet() => {
                warn!(error = %e, "Dropping query, no reply sent");
                None
            }
            Err(e) => {
                error!(error = %e, "Query failed with a non-packet error, no reply sent");
                None
            }
        }
    }

    pub async fn try_process(&self, packet: &[u8]) -> Result<Vec<u8>, DomainError> {
        let query = MessageCodec::decode(packet)?;
        let key = query.key();

        if let Some(answers) = self.cache.get(&key) {
            debug!(key = %key, answers = answers.len(), "Cache hit");
            return MessageCodec::encode_reply(&query, &answers);
        }

        debug!(key = %key, "Cache miss, forwarding upstream");
        let reply = self.forwarder.execute(packet).await?;
        let decoded = MessageCodec::decode_answers(&reply)?;

        if decoded.is_cacheable() {
            if let Some(echoed) = decoded.key() {
                if echoed != key {
                    debug!(
                        requested = %key,
                        echoed = %echoed,
                        "Upstream echoed a different question"
                    );
                }
                let evicted = self.cache.add(echoed, Arc::new(decoded.answers));
                if evicted {
                    debug!("Cache full, evicted least recently used entry");
                }
            }
        } else {
            debug!(key = %key, rcode = ?decoded.response_code, "Upstream reply not cached");
        }

        Ok(reply)
    }
}
