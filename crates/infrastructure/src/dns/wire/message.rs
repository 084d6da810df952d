use blocky_domain::record::RecordType;
use blocky_domain::request::Request;
use blocky_domain::DomainError;
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::binary::BinDecodable;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::time::Duration;

/// Maximum EDNS0 UDP payload size honored on input; responses larger than
/// plain 512 bytes without an OPT record are truncated by the transport
/// layer, not here (§6).
pub const MAX_UDP_PAYLOAD_WITHOUT_EDNS: usize = 512;

fn to_hickory_type(record_type: RecordType) -> hickory_proto::rr::RecordType {
    match record_type {
        RecordType::A => hickory_proto::rr::RecordType::A,
        RecordType::AAAA => hickory_proto::rr::RecordType::AAAA,
        RecordType::CNAME => hickory_proto::rr::RecordType::CNAME,
        RecordType::MX => hickory_proto::rr::RecordType::MX,
        RecordType::TXT => hickory_proto::rr::RecordType::TXT,
        RecordType::PTR => hickory_proto::rr::RecordType::PTR,
        RecordType::SRV => hickory_proto::rr::RecordType::SRV,
        RecordType::NS => hickory_proto::rr::RecordType::NS,
        RecordType::SOA => hickory_proto::rr::RecordType::SOA,
        RecordType::Other(code) => hickory_proto::rr::RecordType::Unknown(code),
    }
}

/// Inverse of `to_hickory_type`, used to build a `Request` from an inbound
/// query (§6 inbound DNS wire). Anything outside the closed set the core
/// reasons about falls back to `Other`.
pub fn from_hickory_type(record_type: hickory_proto::rr::RecordType) -> RecordType {
    match record_type {
        hickory_proto::rr::RecordType::A => RecordType::A,
        hickory_proto::rr::RecordType::AAAA => RecordType::AAAA,
        hickory_proto::rr::RecordType::CNAME => RecordType::CNAME,
        hickory_proto::rr::RecordType::MX => RecordType::MX,
        hickory_proto::rr::RecordType::TXT => RecordType::TXT,
        hickory_proto::rr::RecordType::PTR => RecordType::PTR,
        hickory_proto::rr::RecordType::SRV => RecordType::SRV,
        hickory_proto::rr::RecordType::NS => RecordType::NS,
        hickory_proto::rr::RecordType::SOA => RecordType::SOA,
        other => RecordType::Other(u16::from(other)),
    }
}

/// Encodes `message` to its wire-format bytes (§6).
pub fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
    use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).map_err(|e| DomainError::Parse(e.to_string()))?;
    Ok(buf)
}

/// Decodes wire-format bytes into a `Message` (§6).
pub fn decode(bytes: &[u8]) -> Result<Message, DomainError> {
    Message::from_bytes(bytes).map_err(|e| DomainError::Parse(e.to_string()))
}

/// Builds the empty response skeleton for `request`: question echoed back,
/// header flags set for a successful reply. Callers add answers (or leave
/// it answer-less for e.g. the ipv6-filter stage) and set the rcode.
pub fn base_response(request: &Request) -> Result<Message, DomainError> {
    let name = Name::from_str(&request.name).map_err(|e| DomainError::Parse(format!("invalid query name '{}': {e}", request.name)))?;
    let mut message = Message::new();
    message.set_message_type(MessageType::Response);
    message.set_op_code(OpCode::Query);
    message.set_recursion_desired(true);
    message.set_recursion_available(true);
    message.add_query(Query::query(name, to_hickory_type(request.qtype)));
    Ok(message)
}

/// A NOERROR response with no answers, e.g. the ipv6-filter stage's answer
/// to a disabled-IPv6 AAAA query.
pub fn empty_answer(request: &Request) -> Result<Message, DomainError> {
    let mut message = base_response(request)?;
    message.set_response_code(ResponseCode::NoError);
    Ok(message)
}

pub fn nxdomain(request: &Request) -> Result<Message, DomainError> {
    let mut message = base_response(request)?;
    message.set_response_code(ResponseCode::NXDomain);
    Ok(message)
}

/// Single A or AAAA answer with the given TTL, for hosts-file / custom-DNS
/// / block-synthesis stages.
pub fn single_address_answer(request: &Request, ip: std::net::IpAddr, ttl_secs: u32) -> Result<Message, DomainError> {
    let mut message = base_response(request)?;
    message.set_response_code(ResponseCode::NoError);
    let name = Name::from_str(&request.name).map_err(|e| DomainError::Parse(e.to_string()))?;
    let rdata = match ip {
        std::net::IpAddr::V4(v4) => RData::A(A(v4)),
        std::net::IpAddr::V6(v6) => RData::AAAA(AAAA(v6)),
    };
    message.add_answer(Record::from_rdata(name, ttl_secs, rdata));
    Ok(message)
}

/// `blockType = zeroIp`: A → 0.0.0.0, AAAA → ::.
pub fn zero_ip_answer(request: &Request, ttl_secs: u32) -> Result<Message, DomainError> {
    let ip = match request.qtype {
        RecordType::AAAA => std::net::IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        _ => std::net::IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    };
    single_address_answer(request, ip, ttl_secs)
}

/// The requested EDNS0 UDP payload size, if the query carried an OPT
/// record (§6); `None` means the sender did not advertise EDNS0 at all.
pub fn requested_udp_size(message: &Message) -> Option<u16> {
    message.edns().map(Edns::max_payload)
}

/// Strips the OPT pseudo-record from a response, used when forwarding a
/// reply to a client whose own query carried no EDNS0 option.
pub fn strip_edns(message: &mut Message) {
    message.take_edns();
}

pub fn cacheable_answer_ttl(message: &Message) -> Option<u32> {
    message.answers().iter().map(Record::ttl).min()
}

pub fn is_negative_response(message: &Message) -> bool {
    message.response_code() == ResponseCode::NXDomain || message.answer_count() == 0
}

/// Rewrites every answer's TTL to the seconds remaining until `expiry`,
/// never below zero (§4.7 cache lookup).
pub fn rewrite_ttls(message: &mut Message, remaining: Duration) {
    let secs = remaining.as_secs().min(u32::MAX as u64) as u32;
    for record in message.answers_mut() {
        record.set_ttl(secs);
    }
}

/// Builds the outbound query `Message` sent to an upstream for `request`
/// (§4.8), distinct from `base_response`: message type `Query`, not yet
/// answered.
pub fn build_query(request: &Request) -> Result<Message, DomainError> {
    let name = Name::from_str(&request.name).map_err(|e| DomainError::Parse(format!("invalid query name '{}': {e}", request.name)))?;
    let mut message = Message::new();
    message.set_message_type(MessageType::Query);
    message.set_op_code(OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(Query::query(name, to_hickory_type(request.qtype)));
    Ok(message)
}

/// SERVFAIL terminal response for an unrecoverable upstream/internal error
/// (§7): "respond with SERVFAIL ... never hang".
pub fn servfail(request: &Request) -> Result<Message, DomainError> {
    let mut message = base_response(request)?;
    message.set_response_code(ResponseCode::ServFail);
    Ok(message)
}

/// The PTR question name for a reverse-DNS lookup of `ip` (§4.9
/// client-names stage), e.g. `4.3.2.1.in-addr.arpa.` for `1.2.3.4`.
/// Returns `None` for IPv6 addresses, which the client-names stage skips.
pub fn ptr_query_name(ip: std::net::IpAddr) -> Option<Name> {
    match ip {
        std::net::IpAddr::V4(v4) => {
            let octets = v4.octets();
            let reversed = format!("{}.{}.{}.{}.in-addr.arpa.", octets[3], octets[2], octets[1], octets[0]);
            Name::from_str(&reversed).ok()
        }
        std::net::IpAddr::V6(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocky_domain::request::ClientProtocol;
    use std::net::IpAddr;

    fn sample_request() -> Request {
        Request::new("doubleclick.net.", RecordType::A, IpAddr::from([127, 0, 0, 1]), ClientProtocol::Udp)
    }

    #[test]
    fn zero_ip_answer_is_unspecified_v4() {
        let message = zero_ip_answer(&sample_request(), 21_600).unwrap();
        let answer = &message.answers()[0];
        assert_eq!(answer.ttl(), 21_600);
        match answer.data() {
            RData::A(A(ip)) => assert_eq!(*ip, Ipv4Addr::UNSPECIFIED),
            other => panic!("unexpected rdata {other:?}"),
        }
    }

    #[test]
    fn nxdomain_has_no_answers() {
        let message = nxdomain(&sample_request()).unwrap();
        assert_eq!(message.response_code(), ResponseCode::NXDomain);
        assert!(message.answers().is_empty());
    }

    #[test]
    fn rewrite_ttls_clamps_to_remaining_seconds() {
        let mut message = single_address_answer(&sample_request(), IpAddr::from([1, 2, 3, 4]), 300).unwrap();
        rewrite_ttls(&mut message, Duration::from_secs(42));
        assert_eq!(message.answers()[0].ttl(), 42);
    }

    #[test]
    fn negative_response_detects_empty_answers() {
        let message = empty_answer(&sample_request()).unwrap();
        assert!(is_negative_response(&message));
    }
}
