//! Insertion-ordered header map.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::fraud::error::{FraudHeaderError, FraudHeaderResult};

/// Header name to value mapping, kept in insertion order.
///
/// Names are compared case-insensitively, as HTTP does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FraudHeaders {
    entries: Vec<(String, String)>,
}

impl FraudHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any existing value in place.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Set a header only if it is not present yet. Returns whether it was set.
    pub fn insert_if_absent(&mut self, name: &str, value: impl Into<String>) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.push((name.to_string(), value.into()));
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Convert for an outbound HTTP client.
    pub fn to_header_map(&self) -> FraudHeaderResult<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.len());
        for (name, value) in self.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                FraudHeaderError::InvalidHeaderValue {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| FraudHeaderError::InvalidHeaderValue {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl Serialize for FraudHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_and_replace() {
        let mut h = FraudHeaders::new();
        assert!(h.is_empty());
        h.insert("B", "1");
        h.insert("A", "2");
        h.insert("b", "3");
        assert_eq!(h.names().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(h.get("B"), Some("3"));
    }

    #[test]
    fn test_insert_if_absent() {
        let mut h = FraudHeaders::new();
        assert!(h.insert_if_absent("Gov-Client-Public-Port", "443"));
        assert!(!h.insert_if_absent("gov-client-public-port", "80"));
        assert_eq!(h.get("Gov-Client-Public-Port"), Some("443"));
    }

    #[test]
    fn test_serializes_in_order() {
        let mut h = FraudHeaders::new();
        h.insert("Z", "last-name-first");
        h.insert("A", "x");
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, r#"{"Z":"last-name-first","A":"x"}"#);
    }

    #[test]
    fn test_to_header_map() {
        let mut h = FraudHeaders::new();
        h.insert("Gov-Client-Timezone", "UTC+01:00");
        let map = h.to_header_map().unwrap();
        assert_eq!(map.get("gov-client-timezone").unwrap(), "UTC+01:00");

        h.insert("Gov-Client-Browser-JS-User-Agent", "bad\nvalue");
        assert!(matches!(
            h.to_header_map(),
            Err(FraudHeaderError::InvalidHeaderValue { .. })
        ));
    }
}
