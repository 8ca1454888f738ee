use super::record_type_map::RecordTypeMapper;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use reflector_dns_domain::{DomainError, QueryKey, RecordType};
use std::str::FromStr;
use tracing::debug;

/// Size bound for datagrams without EDNS(0) negotiation (RFC 1035 §4.2.1).
pub const MAX_DATAGRAM_SIZE: usize = 512;

/// An inbound query. Always carries at least one question.
#[derive(Debug, Clone)]
pub struct DecodedQuery {
    pub id: u16,
    pub recursion_desired: bool,
    pub questions: Vec<Query>,
}

impl DecodedQuery {
    /// Identity of the first question, the only one used for caching.
    pub fn key(&self) -> QueryKey {
        MessageCodec::key_for(&self.questions[0])
    }
}

/// An upstream reply, reduced to what the cache needs.
#[derive(Debug, Clone)]
pub struct DecodedAnswer {
    pub id: u16,
    pub questions: Vec<Query>,
    pub answers: Vec<Record>,
    pub response_code: ResponseCode,
}

impl DecodedAnswer {
    /// Identity of the question the upstream echoed back.
    pub fn key(&self) -> Option<QueryKey> {
        self.questions.first().map(MessageCodec::key_for)
    }

    pub fn is_cacheable(&self) -> bool {
        self.response_code == ResponseCode::NoError
            && !self.answers.is_empty()
            && !self.questions.is_empty()
    }
}

pub struct MessageCodec;

impl MessageCodec {
    /// Decodes an inbound query. Truncated or invalid data, replies, and
    /// messages without a question are rejected.
    pub fn decode(bytes: &[u8]) -> Result<DecodedQuery, DomainError> {
        let message = Self::parse(bytes)?;

        if message.message_type() != MessageType::Query {
            return Err(DomainError::MalformedMessage(
                "expected a query, got a response".to_string(),
            ));
        }

        if message.queries().is_empty() {
            return Err(DomainError::EmptyQuestion);
        }

        Ok(DecodedQuery {
            id: message.id(),
            recursion_desired: message.recursion_desired(),
            questions: message.queries().to_vec(),
        })
    }

    /// Decodes an upstream reply into its echoed questions and answer records.
    pub fn decode_answers(bytes: &[u8]) -> Result<DecodedAnswer, DomainError> {
        let message = Self::parse(bytes)?;

        debug!(
            id = message.id(),
            rcode = ?message.response_code(),
            answers = message.answers().len(),
            "Upstream reply decoded"
        );

        Ok(DecodedAnswer {
            id: message.id(),
            questions: message.queries().to_vec(),
            answers: message.answers().to_vec(),
            response_code: message.response_code(),
        })
    }

    /// Builds a successful reply carrying `answers`, reusing the request's
    /// transaction id, RD flag and questions. A reply that would exceed
    /// [`MAX_DATAGRAM_SIZE`] is sent without answers and with TC set.
    pub fn encode_reply(
        query: &DecodedQuery,
        answers: &[Record],
    ) -> Result<Vec<u8>, DomainError> {
        let reply = Self::reply_message(query, answers);
        let bytes = Self::serialize(&reply)?;
        if bytes.len() <= MAX_DATAGRAM_SIZE {
            return Ok(bytes);
        }

        debug!(
            id = query.id,
            size = bytes.len(),
            "Reply exceeds datagram size, truncating"
        );
        let mut truncated = Self::reply_message(query, &[]);
        truncated.set_truncated(true);
        Self::serialize(&truncated)
    }

    /// Builds a recursive query for `domain` with a random transaction id.
    pub fn build_query(
        domain: &str,
        record_type: RecordType,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        let name = Name::from_str(domain).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);
        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        Ok((id, Self::serialize(&message)?))
    }

    pub fn key_for(query: &Query) -> QueryKey {
        QueryKey::new(
            &query.name().to_ascii(),
            RecordTypeMapper::from_hickory(query.query_type()),
        )
    }

    fn parse(bytes: &[u8]) -> Result<Message, DomainError> {
        Message::from_vec(bytes).map_err(|e| DomainError::MalformedMessage(e.to_string()))
    }

    fn reply_message(query: &DecodedQuery, answers: &[Record]) -> Message {
        let mut message = Message::new(query.id, MessageType::Response, OpCode::Query);
        message.set_recursion_desired(query.recursion_desired);
        message.set_recursion_available(true);
        message.set_response_code(ResponseCode::NoError);
        message.add_queries(query.questions.iter().cloned());
        message.add_answers(answers.iter().cloned());
        message
    }

    fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(MAX_DATAGRAM_SIZE);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::MalformedMessage(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
