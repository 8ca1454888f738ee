use hickory_proto::rr::Record;
use reflector_dns_domain::QueryKey;
use std::sync::Arc;

/// Answer records cached for one query identity, in upstream order.
pub type CachedAnswers = Arc<Vec<Record>>;

/// Port for the answer cache consulted on every inbound query.
///
/// `get` must refresh recency; `add` reports whether an older entry had to be
/// evicted to stay within capacity.
pub trait AnswerCache: Send + Sync {
    fn get(&self, key: &QueryKey) -> Option<CachedAnswers>;

    fn add(&self, key: QueryKey, answers: CachedAnswers) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
