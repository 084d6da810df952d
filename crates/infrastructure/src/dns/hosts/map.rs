use blocky_domain::config::LocalDnsRecord;
use blocky_domain::record::RecordType;
use blocky_domain::request::Request;
use rustc_hash::FxHashMap;
use std::net::IpAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub struct HostsEntry {
    pub ip: IpAddr,
    pub ttl_secs: u32,
}

/// Static name→address map backing the custom-DNS and hosts-file stages
/// (§4.9): both serve answers from a fixed table with the same subdomain
/// walk used by domain catalogs (§4.4).
#[derive(Default)]
pub struct HostsMap {
    entries: FxHashMap<String, HostsEntry>,
}

impl HostsMap {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the custom-DNS map from configured local records.
    pub fn from_local_records(records: &[LocalDnsRecord], default_domain: &Option<String>) -> Self {
        let mut entries = FxHashMap::default();
        for record in records {
            let Ok(ip) = IpAddr::from_str(&record.ip) else { continue };
            let fqdn = record.fqdn(default_domain).to_ascii_lowercase();
            entries.insert(fqdn, HostsEntry { ip, ttl_secs: record.ttl_or_default() });
        }
        Self { entries }
    }

    /// Parses a standard `/etc/hosts`-format file: `<ip> <hostname> [alias...]`,
    /// blank lines and `#` comments ignored. Aliases get the same entry as
    /// the primary hostname.
    pub fn from_hosts_file(text: &str, ttl_secs: u32) -> Self {
        let mut entries = FxHashMap::default();
        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let Some(ip_field) = fields.next() else { continue };
            let Ok(ip) = IpAddr::from_str(ip_field) else { continue };
            for host in fields {
                entries.insert(host.to_ascii_lowercase(), HostsEntry { ip, ttl_secs });
            }
        }
        Self { entries }
    }

    fn lookup_exact(&self, name: &str, qtype: RecordType) -> Option<HostsEntry> {
        let entry = self.entries.get(name)?;
        let matches_family = matches!(
            (qtype, entry.ip),
            (RecordType::A, IpAddr::V4(_)) | (RecordType::AAAA, IpAddr::V6(_))
        );
        matches_family.then_some(*entry)
    }

    /// Subdomain-walk lookup matching §4.4's chained-match algorithm: while
    /// the candidate contains a dot, test it exactly, then drop the
    /// leftmost label and retry.
    pub fn lookup_chain(&self, name: &str, qtype: RecordType) -> Option<HostsEntry> {
        let mut cur = name;
        loop {
            if let Some(entry) = self.lookup_exact(cur, qtype) {
                return Some(entry);
            }
            if !cur.contains('.') {
                return None;
            }
            match Request::parent_label(cur) {
                Some(parent) => cur = parent,
                None => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_record_resolves_by_fqdn() {
        let records = vec![LocalDnsRecord {
            hostname: "nas".to_string(),
            domain: Some("lab.local".to_string()),
            ip: "192.168.1.100".to_string(),
            record_type: "A".to_string(),
            ttl: None,
        }];
        let map = HostsMap::from_local_records(&records, &None);
        let entry = map.lookup_chain("nas.lab.local", RecordType::A).unwrap();
        assert_eq!(entry.ip, IpAddr::from([192, 168, 1, 100]));
        assert_eq!(entry.ttl_secs, 300);
    }

    #[test]
    fn hosts_file_parses_aliases_and_ignores_comments() {
        let text = "# comment\n127.0.0.1 localhost loopback\n\n10.0.0.5 printer.lan\n";
        let map = HostsMap::from_hosts_file(text, 60);
        assert_eq!(map.len(), 3);
        assert!(map.lookup_chain("loopback", RecordType::A).is_some());
        assert!(map.lookup_chain("printer.lan", RecordType::A).is_some());
    }

    #[test]
    fn record_type_family_mismatch_does_not_match() {
        let records = vec![LocalDnsRecord {
            hostname: "host".to_string(),
            domain: None,
            ip: "10.0.0.1".to_string(),
            record_type: "A".to_string(),
            ttl: None,
        }];
        let map = HostsMap::from_local_records(&records, &None);
        assert!(map.lookup_chain("host", RecordType::AAAA).is_none());
    }
}
