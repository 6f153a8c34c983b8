//! Jabber identifiers (`node@domain/resource`).

use std::fmt;
use std::str::FromStr;

use super::error::{StanzaError, StanzaResult};

/// Upper bound for each JID part, in bytes.
const MAX_PART_LEN: usize = 1023;

/// A parsed JID.
///
/// Only structural validation is applied; stringprep normalisation is left to
/// the routing layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Jid {
    node: Option<String>,
    domain: String,
    resource: Option<String>,
}

impl Jid {
    /// Builds a JID from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`StanzaError::InvalidJid`] when the domain is empty or any
    /// part is empty or too long.
    pub fn new(node: Option<&str>, domain: &str, resource: Option<&str>) -> StanzaResult<Self> {
        let raw = render(node, domain, resource);
        if domain.is_empty() {
            return Err(StanzaError::invalid_jid(raw, "domain must not be empty"));
        }
        if node.is_some_and(str::is_empty) {
            return Err(StanzaError::invalid_jid(raw, "node must not be empty"));
        }
        if resource.is_some_and(str::is_empty) {
            return Err(StanzaError::invalid_jid(raw, "resource must not be empty"));
        }
        let too_long = [node, Some(domain), resource]
            .into_iter()
            .flatten()
            .any(|part| part.len() > MAX_PART_LEN);
        if too_long {
            return Err(StanzaError::invalid_jid(raw, "part exceeds 1023 bytes"));
        }

        Ok(Self {
            node: node.map(str::to_owned),
            domain: domain.to_owned(),
            resource: resource.map(str::to_owned),
        })
    }

    /// Returns the local part, which is the offline queue key.
    #[must_use]
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    /// Returns the domain part.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the resource part.
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Returns this JID without its resource.
    #[must_use]
    pub fn to_bare(&self) -> Self {
        Self {
            node: self.node.clone(),
            domain: self.domain.clone(),
            resource: None,
        }
    }

    /// Returns `true` when no resource is present.
    #[must_use]
    pub const fn is_bare(&self) -> bool {
        self.resource.is_none()
    }
}

impl FromStr for Jid {
    type Err = StanzaError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (address, resource) = match raw.split_once('/') {
            Some((address, resource)) => (address, Some(resource)),
            None => (raw, None),
        };
        let (node, domain) = match address.split_once('@') {
            Some((node, domain)) => (Some(node), domain),
            None => (None, address),
        };
        Self::new(node, domain, resource)
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(
            self.node.as_deref(),
            &self.domain,
            self.resource.as_deref(),
        ))
    }
}

fn render(node: Option<&str>, domain: &str, resource: Option<&str>) -> String {
    let mut rendered = String::new();
    if let Some(local) = node {
        rendered.push_str(local);
        rendered.push('@');
    }
    rendered.push_str(domain);
    if let Some(res) = resource {
        rendered.push('/');
        rendered.push_str(res);
    }
    rendered
}
