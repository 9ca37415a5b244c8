//! Distinguished names decomposed for issuer/subject matching
//!
//! Matching compares the multiset of `(attribute type, normalized value)` pairs,
//! so attribute ordering, RDN grouping and the choice of string type do not
//! affect equality. The RFC 4514 rendering is kept for log output only.

use std::fmt;
use std::hash::{Hash, Hasher};

use der::Tagged;
use der::asn1::{Ia5StringRef, PrintableStringRef, Utf8StringRef};
use x509_cert::name::Name;

/// One decomposed attribute of a name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct NameAttribute {
    oid: String,
    value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum AttributeValue {
    /// Directory string, whitespace-collapsed and case-folded
    Text(String),
    /// Any other encoding: tag byte followed by the raw value bytes
    Raw(Vec<u8>),
}

/// Subject or issuer name of a certificate
#[derive(Debug, Clone)]
pub struct DistinguishedName {
    rendered: String,
    attributes: Vec<NameAttribute>,
}

impl DistinguishedName {
    /// Decompose an X.509 `Name`
    #[must_use]
    pub fn from_name(name: &Name) -> Self {
        let mut attributes = Vec::new();

        for rdn in &name.0 {
            for atv in rdn.0.iter() {
                attributes.push(NameAttribute {
                    oid: atv.oid.to_string(),
                    value: decode_value(&atv.value),
                });
            }
        }

        attributes.sort();

        Self {
            rendered: name.to_string(),
            attributes,
        }
    }

    /// True when the name carries no attributes at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// RFC 4514 string form, as encoded in the certificate
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

fn decode_value(value: &der::Any) -> AttributeValue {
    let text = if let Ok(s) = PrintableStringRef::try_from(value) {
        Some(s.to_string())
    } else if let Ok(s) = Utf8StringRef::try_from(value) {
        Some(s.to_string())
    } else if let Ok(s) = Ia5StringRef::try_from(value) {
        Some(s.to_string())
    } else {
        None
    };

    match text {
        Some(text) => AttributeValue::Text(normalize(&text)),
        None => {
            let mut raw = Vec::with_capacity(value.value().len() + 1);
            raw.push(u8::from(value.tag()));
            raw.extend_from_slice(value.value());
            AttributeValue::Raw(raw)
        }
    }
}

/// Trim, collapse internal whitespace runs and case-fold
fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl PartialEq for DistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
    }
}

impl Eq for DistinguishedName {}

impl Hash for DistinguishedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.attributes.hash(state);
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dn(s: &str) -> DistinguishedName {
        let name = Name::from_str(s)
            .unwrap_or_else(|e| panic!("test name {s} should parse: {e}"));
        DistinguishedName::from_name(&name)
    }

    #[test]
    fn test_attribute_order_is_ignored() {
        assert_eq!(dn("CN=Gateway CA,O=Example,C=EU"), dn("C=EU,O=Example,CN=Gateway CA"));
    }

    #[test]
    fn test_case_and_whitespace_are_normalized() {
        assert_eq!(dn("CN=Gateway   CA,O=Example"), dn("CN=gateway ca,O=EXAMPLE"));
    }

    #[test]
    fn test_different_values_do_not_match() {
        assert_ne!(dn("CN=Gateway CA,O=Example"), dn("CN=Other CA,O=Example"));
        assert_ne!(dn("CN=Gateway CA"), dn("CN=Gateway CA,O=Example"));
    }

    #[test]
    fn test_rendering_keeps_encoded_form() {
        let name = dn("CN=Gateway CA,O=Example");
        assert!(name.as_str().contains("Gateway CA"));
        assert!(!name.is_empty());
    }
}
