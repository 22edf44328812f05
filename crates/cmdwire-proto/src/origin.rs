//! Originating network address of a command.

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

/// Address a command originated from.
///
/// Travels on the wire as its ASCII text: dotted-quad or RFC 5952 text for IP
/// addresses, the name itself for hosts. Only the constructors below can
/// build one, so every origin encodes to non-empty ASCII of at most
/// [`Origin::MAX_HOST_LEN`] bytes, and decoding that text yields an equal
/// origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Origin(Repr);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    Ip(IpAddr),
    /// Non-empty ASCII, never valid IP address text.
    Host(String),
}

impl Origin {
    /// Longest host name, as for DNS.
    pub const MAX_HOST_LEN: usize = 255;

    /// Origin from a host name.
    ///
    /// Names that are IP address text become IP origins.
    pub fn host(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if let Ok(ip) = name.parse::<IpAddr>() {
            return Ok(Self(Repr::Ip(ip)));
        }
        if name.is_empty() {
            return Err(ProtocolError::EmptyOrigin);
        }
        if !name.is_ascii() {
            return Err(ProtocolError::NonAsciiOrigin(name));
        }
        if name.len() > Self::MAX_HOST_LEN {
            return Err(ProtocolError::OriginTooLong { len: name.len(), max: Self::MAX_HOST_LEN });
        }
        Ok(Self(Repr::Host(name)))
    }

    /// Parse origin text as it appears on the wire.
    pub fn parse(text: &str) -> Result<Self> {
        Self::host(text)
    }

    /// IP address, if this origin is one.
    pub fn ip(&self) -> Option<IpAddr> {
        match &self.0 {
            Repr::Ip(ip) => Some(*ip),
            Repr::Host(_) => None,
        }
    }

    /// Host name, if this origin is one.
    pub fn host_name(&self) -> Option<&str> {
        match &self.0 {
            Repr::Ip(_) => None,
            Repr::Host(name) => Some(name),
        }
    }

    /// ASCII text written to the wire.
    pub fn to_ascii(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Ip(ip) => fmt::Display::fmt(ip, f),
            Repr::Host(name) => f.write_str(name),
        }
    }
}

impl FromStr for Origin {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Origin {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self> {
        Self::host(value)
    }
}

impl From<Origin> for String {
    fn from(origin: Origin) -> Self {
        origin.to_ascii()
    }
}

impl From<IpAddr> for Origin {
    fn from(ip: IpAddr) -> Self {
        Self(Repr::Ip(ip))
    }
}

impl From<Ipv4Addr> for Origin {
    fn from(ip: Ipv4Addr) -> Self {
        Self::from(IpAddr::V4(ip))
    }
}

impl From<Ipv6Addr> for Origin {
    fn from(ip: Ipv6Addr) -> Self {
        Self::from(IpAddr::V6(ip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_text_is_nine_bytes() {
        let origin = Origin::from(Ipv4Addr::LOCALHOST);
        assert_eq!(origin.to_ascii(), "127.0.0.1");
        assert_eq!(origin.to_ascii().len(), 9);
    }

    #[test]
    fn ip_text_normalizes_to_ip() {
        let origin = Origin::host("10.1.2.3").unwrap();
        assert_eq!(origin, Origin::from(Ipv4Addr::new(10, 1, 2, 3)));
        assert_eq!(origin.host_name(), None);

        let origin: Origin = "::1".parse().unwrap();
        assert_eq!(origin.ip(), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    }

    #[test]
    fn host_name_kept_verbatim() {
        let origin = Origin::host("build-agent-07.lan").unwrap();
        assert_eq!(origin.host_name(), Some("build-agent-07.lan"));
        assert_eq!(origin.ip(), None);
        assert_eq!(origin.to_string(), "build-agent-07.lan");
    }

    #[test]
    fn empty_host_rejected() {
        assert!(matches!(Origin::host(""), Err(ProtocolError::EmptyOrigin)));
    }

    #[test]
    fn non_ascii_host_rejected() {
        let result = Origin::host("bücher");
        assert!(matches!(result, Err(ProtocolError::NonAsciiOrigin(name)) if name == "bücher"));
    }

    #[test]
    fn host_length_capped() {
        let longest = "a".repeat(Origin::MAX_HOST_LEN);
        assert_eq!(Origin::host(longest.clone()).unwrap().host_name(), Some(longest.as_str()));

        let result = Origin::host("a".repeat(Origin::MAX_HOST_LEN + 1));
        assert!(matches!(result, Err(ProtocolError::OriginTooLong { len: 256, max: 255 })));
    }

    #[test]
    fn deserialize_validates_text() {
        let mut cbor = Vec::new();
        ciborium::ser::into_writer("bücher", &mut cbor).unwrap();
        let result: std::result::Result<Origin, _> = ciborium::de::from_reader(cbor.as_slice());
        assert!(result.is_err());

        let mut cbor = Vec::new();
        ciborium::ser::into_writer("127.0.0.1", &mut cbor).unwrap();
        let origin: Origin = ciborium::de::from_reader(cbor.as_slice()).unwrap();
        assert_eq!(origin, Origin::from(Ipv4Addr::LOCALHOST));
    }
}
