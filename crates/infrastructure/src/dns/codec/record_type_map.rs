use hickory_proto::rr::RecordType as HickoryRecordType;
use reflector_dns_domain::RecordType;

/// Bidirectional mapping between domain and hickory record types. Both sides
/// are numeric QTYPEs underneath, so no code is lost in either direction.
pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_hickory(record_type: RecordType) -> HickoryRecordType {
        HickoryRecordType::from(record_type.to_u16())
    }

    pub fn from_hickory(record_type: HickoryRecordType) -> RecordType {
        RecordType::from_u16(u16::from(record_type))
    }
}
