use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// One length bucket: every entry is exactly `width` bytes, concatenated
/// into a single sorted contiguous buffer. This bounds per-entry overhead
/// to the raw string bytes plus O(1) bucket lookup and enables a
/// branch-free binary search with no per-entry allocation (§4.4, §9).
struct Bucket {
    width: usize,
    buf: Box<[u8]>,
}

impl Bucket {
    fn len(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.buf.len() / self.width
        }
    }

    fn entry(&self, i: usize) -> &[u8] {
        &self.buf[i * self.width..(i + 1) * self.width]
    }

    fn contains(&self, needle: &[u8]) -> bool {
        let n = self.len();
        let mut lo = 0usize;
        let mut hi = n;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.entry(mid).cmp(needle) {
                std::cmp::Ordering::Equal => return true,
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
            }
        }
        false
    }
}

/// Lowercased exact domain strings, bucketed by byte length (§3 string
/// sub-catalog). Immutable once built; `StringCatalogBuilder` produces
/// replacements for atomic swap-in on refresh.
pub struct StringCatalog {
    buckets: FxHashMap<usize, Bucket>,
    entry_count: usize,
}

impl StringCatalog {
    pub fn contains(&self, s: &str) -> bool {
        match self.buckets.get(&s.len()) {
            Some(bucket) => bucket.contains(s.as_bytes()),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    pub fn empty() -> Self {
        Self { buckets: FxHashMap::default(), entry_count: 0 }
    }
}

#[derive(Default)]
pub struct StringCatalogBuilder {
    pending: FxHashMap<usize, BTreeSet<Box<str>>>,
}

impl StringCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a lowercased exact domain string. Duplicate entries collapse
    /// via the backing `BTreeSet` (§3).
    pub fn insert(&mut self, domain: &str) {
        self.pending.entry(domain.len()).or_default().insert(domain.into());
    }

    pub fn build(self) -> StringCatalog {
        let mut buckets = FxHashMap::default();
        let mut entry_count = 0usize;
        for (width, entries) in self.pending {
            entry_count += entries.len();
            let mut buf = Vec::with_capacity(entries.len() * width);
            for entry in &entries {
                buf.extend_from_slice(entry.as_bytes());
            }
            buckets.insert(width, Bucket { width, buf: buf.into_boxed_slice() });
        }
        StringCatalog { buckets, entry_count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_inserted_entries_across_buckets() {
        let mut b = StringCatalogBuilder::new();
        b.insert("ads.example.com");
        b.insert("heise.de");
        b.insert("a.io");
        let cat = b.build();
        assert!(cat.contains("ads.example.com"));
        assert!(cat.contains("heise.de"));
        assert!(cat.contains("a.io"));
        assert!(!cat.contains("b.io"));
        assert!(!cat.contains("notpresent.example.com"));
    }

    #[test]
    fn duplicate_entries_collapse() {
        let mut b = StringCatalogBuilder::new();
        b.insert("doubleclick.net");
        b.insert("doubleclick.net");
        let cat = b.build();
        assert_eq!(cat.len(), 1);
    }

    #[test]
    fn build_is_order_independent() {
        let mut forward = StringCatalogBuilder::new();
        for d in ["z.com", "a.com", "m.com"] {
            forward.insert(d);
        }
        let mut shuffled = StringCatalogBuilder::new();
        for d in ["m.com", "z.com", "a.com"] {
            shuffled.insert(d);
        }
        let (c1, c2) = (forward.build(), shuffled.build());
        for d in ["z.com", "a.com", "m.com", "nope.com"] {
            assert_eq!(c1.contains(d), c2.contains(d));
        }
    }
}
