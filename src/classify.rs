//! Turns a family tag and raw address bytes into an [`Address`].

use std::net::{Ipv4Addr, Ipv6Addr};

use log::warn;

use crate::{Address, AddressFamily, NetworkAddress};

/// Classifies one address record.
///
/// Dispatch is on `family` alone: IPv4 takes exactly 4 bytes, IPv6 exactly 16.
/// The netmask, when present, is parsed with the same family as the address.
///
/// This never fails. An unknown family yields [`Address::Other`] carrying the
/// raw tag, and so does an IPv4 or IPv6 tag whose buffer has the wrong
/// length. A missing or malformed netmask yields `netmask: None`.
///
/// ```
/// # use lsdev::{classify, AddressFamily};
/// let address = classify(AddressFamily::V4, &[127, 0, 0, 1], Some(&[255, 0, 0, 0][..]));
/// assert_eq!(address.to_string(), "127.0.0.1");
/// assert_eq!(address.netmask().unwrap().to_string(), "255.0.0.0");
/// ```
pub fn classify(family: AddressFamily, address: &[u8], netmask: Option<&[u8]>) -> Address {
    match family {
        AddressFamily::V4 => match ipv4(address) {
            Some(ip) => Address::V4(NetworkAddress::new(ip, netmask.and_then(ipv4))),
            None => degraded(family, address.len()),
        },
        AddressFamily::V6 => match ipv6(address) {
            Some(ip) => Address::V6(NetworkAddress::new(ip, netmask.and_then(ipv6))),
            None => degraded(family, address.len()),
        },
        AddressFamily::Other(tag) => Address::Other(tag),
    }
}

fn degraded(family: AddressFamily, len: usize) -> Address {
    warn!(
        "{family} address record has {len} bytes, expected {}; showing it as family {}",
        family.address_len().unwrap_or_default(),
        family.raw()
    );
    Address::Other(family.raw())
}

pub(crate) fn ipv4(bytes: &[u8]) -> Option<Ipv4Addr> {
    <[u8; 4]>::try_from(bytes).ok().map(Ipv4Addr::from)
}

pub(crate) fn ipv6(bytes: &[u8]) -> Option<Ipv6Addr> {
    <[u8; 16]>::try_from(bytes).ok().map(Ipv6Addr::from)
}
