//! DNS wire-format codec.
//!
//! Translates raw datagrams into the minimal structured view the proxy needs
//! (transaction id, question section, answer records) and back.

mod message_codec;
mod record_type_map;

pub use message_codec::{DecodedAnswer, DecodedQuery, MessageCodec, MAX_DATAGRAM_SIZE};
pub use record_type_map::RecordTypeMapper;
