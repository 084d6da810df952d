mod message;

pub use message::{
    base_response, build_query, cacheable_answer_ttl, decode, empty_answer, encode, from_hickory_type, is_negative_response,
    nxdomain, ptr_query_name, requested_udp_size, rewrite_ttls, servfail, single_address_answer, strip_edns, zero_ip_answer,
    MAX_UDP_PAYLOAD_WITHOUT_EDNS,
};
