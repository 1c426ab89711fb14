// # Record Set
//
// In-memory model of a hosts file: an ordered list of address records, each
// holding one IP address and the hostnames that resolve to it.
//
// ## File Format
//
// ```text
// # comment
// 0.0.0.0 frantj.cc homelab.frantj.cc   # trailing comment
// 127.0.0.1 localhost.frantj.cc
// ```
//
// ## Validation Tiers
//
// - A line whose first field is not an IP address is skipped silently.
// - A line with an address but an invalid hostname fails the whole decode.
//
// ## Merging
//
// `Hosts::add` and `Hosts::remove` keep at most one entry per address once
// the set is driven through them. `Hosts::decode` does not merge: every
// accepted line becomes its own entry, in file order.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static HOSTNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*$").expect("hostname pattern is valid")
});

/// Returns `true` if `hostname` is acceptable in a hosts file
pub fn is_valid_hostname(hostname: &str) -> bool {
    HOSTNAME_REGEX.is_match(hostname)
}

/// Parse an IPv4 or IPv6 literal into its canonical form
///
/// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) collapse to the IPv4
/// address so both spellings land on the same entry.
pub fn parse_address(value: &str) -> Option<IpAddr> {
    value.parse::<IpAddr>().ok().map(|ip| ip.to_canonical())
}

/// One address and the hostnames associated with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// The address, in canonical form
    pub ip: IpAddr,
    /// Hostnames in insertion order
    pub hostnames: Vec<String>,
}

impl Host {
    /// Create a host entry from trusted in-memory values
    ///
    /// No hostname validation is performed here; that happens in
    /// [`Hosts::decode`].
    pub fn new<I, S>(ip: IpAddr, hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ip: ip.to_canonical(),
            hostnames: hostnames.into_iter().map(Into::into).collect(),
        }
    }

    fn contains(&self, hostname: &str) -> bool {
        self.hostnames.iter().any(|h| h == hostname)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ip, self.hostnames.join(" "))
    }
}

/// An ordered set of address records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hosts {
    hosts: Vec<Host>,
}

impl Hosts {
    /// Create an empty record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode hosts-file text
    ///
    /// Everything from the first `#` on a line is ignored, and blank lines are
    /// skipped. Each remaining line needs an address and at least one
    /// hostname.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidHostsLine`] if a line has fewer than two fields
    /// - [`Error::InvalidHostname`] if a line with a valid address carries a
    ///   hostname outside `[A-Za-z0-9_-]` labels
    /// - [`Error::Io`] if the reader fails
    pub fn decode<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut hosts = Vec::new();
        let mut raw = Vec::new();

        loop {
            raw.clear();
            if reader.read_until(b'\n', &mut raw)? == 0 {
                break;
            }

            // Comments may carry any bytes; only the content before `#` is text.
            let content = match raw.iter().position(|&b| b == b'#') {
                Some(end) => &raw[..end],
                None => &raw[..],
            };
            let line = String::from_utf8_lossy(content);
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 2 {
                return Err(Error::invalid_line(line));
            }

            let Some(ip) = parse_address(fields[0]) else {
                continue;
            };

            if let Some(hostname) = fields[1..].iter().find(|h| !is_valid_hostname(h)) {
                return Err(Error::invalid_hostname(*hostname));
            }

            hosts.push(Host::new(ip, fields[1..].iter().copied()));
        }

        Ok(Self { hosts })
    }

    /// Encode the record set as hosts-file text
    ///
    /// Entries without hostnames are omitted.
    pub fn encode<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{self}")
    }

    /// Merge `candidate` into the set
    ///
    /// Returns `true` if the set changed. Hostnames already present on the
    /// matching entry are not appended again.
    pub fn add(&mut self, candidate: Host) -> bool {
        if candidate.hostnames.is_empty() {
            return false;
        }

        let ip = candidate.ip.to_canonical();
        if let Some(existing) = self.hosts.iter_mut().find(|h| h.ip == ip) {
            let mut modified = false;
            for hostname in candidate.hostnames {
                if !existing.contains(&hostname) {
                    existing.hostnames.push(hostname);
                    modified = true;
                }
            }
            return modified;
        }

        let mut entry = Host::new(ip, Vec::<String>::new());
        for hostname in candidate.hostnames {
            if !entry.contains(&hostname) {
                entry.hostnames.push(hostname);
            }
        }
        self.hosts.push(entry);

        true
    }

    /// Remove the candidate's hostnames from the set
    ///
    /// Only the first entry with the candidate's address is touched. If no
    /// entry has that address, every entry that has run out of hostnames is
    /// dropped instead. Returns `true` if the set changed.
    pub fn remove(&mut self, candidate: &Host) -> bool {
        if candidate.hostnames.is_empty() {
            return false;
        }

        let ip = candidate.ip.to_canonical();
        if let Some(existing) = self.hosts.iter_mut().find(|h| h.ip == ip) {
            let before = existing.hostnames.len();
            existing.hostnames.retain(|h| !candidate.contains(h));
            return existing.hostnames.len() != before;
        }

        let before = self.hosts.len();
        self.hosts.retain(|h| !h.hostnames.is_empty());
        self.hosts.len() != before
    }

    /// First entry for `ip`, if any
    pub fn get(&self, ip: &IpAddr) -> Option<&Host> {
        let ip = ip.to_canonical();
        self.hosts.iter().find(|h| h.ip == ip)
    }

    /// Iterate over entries in order
    pub fn iter(&self) -> std::slice::Iter<'_, Host> {
        self.hosts.iter()
    }

    /// Number of entries, including entries without hostnames
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Check if the set has no entries
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl FromStr for Hosts {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s.as_bytes())
    }
}

impl fmt::Display for Hosts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for host in self.hosts.iter().filter(|h| !h.hostnames.is_empty()) {
            writeln!(f, "{host}")?;
        }
        Ok(())
    }
}

impl FromIterator<Host> for Hosts {
    fn from_iter<T: IntoIterator<Item = Host>>(iter: T) -> Self {
        Self {
            hosts: iter
                .into_iter()
                .map(|host| Host {
                    ip: host.ip.to_canonical(),
                    ..host
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Hosts {
    type Item = &'a Host;
    type IntoIter = std::slice::Iter<'a, Host>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.iter()
    }
}
