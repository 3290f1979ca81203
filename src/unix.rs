use log::{debug, trace};

use crate::{
    classify, AddressFamily, Enumerate, Error, Interface, InterfaceFlags, InterfaceIndex, MacAddr,
    Result,
};
use std::ffi::CStr;
use std::marker::PhantomData;

/// Enumerates interfaces by walking the `getifaddrs(3)` list.
///
/// The C library returns one record per (interface, address) pair. Records
/// are folded into one [`Interface`] per name, in first-seen order. Link-layer
/// records supply the hardware address; IPv4 and IPv6 records become
/// addresses; any other family becomes [`crate::Address::Other`].
#[derive(Debug, Default, Clone, Copy)]
pub struct IfaddrsEnumerator;

impl Enumerate for IfaddrsEnumerator {
    fn name(&self) -> &'static str {
        "getifaddrs"
    }

    fn enumerate(&self) -> Result<Vec<Interface>> {
        let list = IfAddrs::query()?;
        let mut interfaces: Vec<Interface> = Vec::new();

        for ifaddr in list.iter() {
            let name = unsafe { CStr::from_ptr(ifaddr.ifa_name) }
                .to_string_lossy()
                .into_owned();

            let position = match interfaces.iter().position(|i| i.name == name) {
                Some(position) => position,
                None => {
                    let mut interface = Interface::new(name);
                    interface.index = _if_nametoindex(&interface.name).ok();
                    interfaces.push(interface);
                    interfaces.len() - 1
                }
            };
            let interface = &mut interfaces[position];

            // Platforms have varying size for ifa_flags, so just work in u64
            let flags = native_flags(ifaddr.ifa_flags as u64);
            interface.flags |= flags;

            let Some(addr) = (unsafe { ifaddr.ifa_addr.as_ref() }) else {
                trace!("{}: record without an address", interface.name);
                continue;
            };

            let tag = addr.sa_family as u16;
            if is_link_family(tag) {
                if let Some(mac) = unsafe { link_address(addr) } {
                    interface.hardware_address = Some(mac);
                }
                continue;
            }

            let family = AddressFamily::from_raw(tag);
            let bytes = unsafe { sockaddr_bytes(addr, family) }.unwrap_or_default();
            let netmask = unsafe { sockaddr_bytes(ifaddr.ifa_netmask, family) };
            let mut address = classify(family, &bytes, netmask.as_deref());

            // https://docs.rs/libc/latest/aarch64-unknown-linux-gnu/libc/struct.ifaddrs.html
            #[cfg(any(target_os = "linux", target_os = "android"))]
            let associated = unsafe { sockaddr_bytes(ifaddr.ifa_ifu, family) };

            // https://docs.rs/libc/latest/aarch64-unknown-openbsd/libc/struct.ifaddrs.html
            #[cfg(not(any(target_os = "linux", target_os = "android")))]
            let associated = unsafe { sockaddr_bytes(ifaddr.ifa_dstaddr, family) };

            if flags.contains(InterfaceFlags::BROADCAST) {
                address = address.with_broadcast(associated.as_deref());
            } else if flags.contains(InterfaceFlags::POINTOPOINT) {
                address = address.with_destination(associated.as_deref());
            }

            trace!("{}: {family} record {address}", interface.name);
            interface.addresses.push(address);
        }

        debug!("getifaddrs reported {} interfaces", interfaces.len());
        Ok(interfaces)
    }
}

/// Owns the list returned by `getifaddrs` and frees it on drop.
struct IfAddrs {
    head: *mut libc::ifaddrs,
}

impl IfAddrs {
    fn query() -> Result<Self> {
        let mut head: *mut libc::ifaddrs = std::ptr::null_mut();
        let result = unsafe { libc::getifaddrs(&mut head) };
        if result != 0 {
            return Err(Error::last_os_error());
        }
        Ok(IfAddrs { head })
    }

    fn iter(&self) -> IfAddrsIter<'_> {
        IfAddrsIter {
            current: self.head,
            _list: PhantomData,
        }
    }
}

impl Drop for IfAddrs {
    fn drop(&mut self) {
        if !self.head.is_null() {
            unsafe { libc::freeifaddrs(self.head) };
        }
    }
}

struct IfAddrsIter<'a> {
    current: *mut libc::ifaddrs,
    _list: PhantomData<&'a IfAddrs>,
}

impl<'a> Iterator for IfAddrsIter<'a> {
    type Item = &'a libc::ifaddrs;

    fn next(&mut self) -> Option<Self::Item> {
        let ifaddr = unsafe { self.current.as_ref() }?;
        self.current = ifaddr.ifa_next;
        Some(ifaddr)
    }
}

/// Translates a native `IFF_*` mask into [`InterfaceFlags`].
pub(crate) fn native_flags(raw: u64) -> InterfaceFlags {
    const COMMON: &[(u64, InterfaceFlags)] = &[
        (libc::IFF_UP as u64, InterfaceFlags::UP),
        (libc::IFF_BROADCAST as u64, InterfaceFlags::BROADCAST),
        (libc::IFF_DEBUG as u64, InterfaceFlags::DEBUG),
        (libc::IFF_LOOPBACK as u64, InterfaceFlags::LOOPBACK),
        (libc::IFF_POINTOPOINT as u64, InterfaceFlags::POINTOPOINT),
        (libc::IFF_RUNNING as u64, InterfaceFlags::RUNNING),
        (libc::IFF_NOARP as u64, InterfaceFlags::NOARP),
        (libc::IFF_PROMISC as u64, InterfaceFlags::PROMISC),
        (libc::IFF_ALLMULTI as u64, InterfaceFlags::ALLMULTI),
        (libc::IFF_MULTICAST as u64, InterfaceFlags::MULTICAST),
    ];

    #[cfg(any(target_os = "linux", target_os = "android"))]
    const PLATFORM: &[(u64, InterfaceFlags)] = &[
        (libc::IFF_NOTRAILERS as u64, InterfaceFlags::NOTRAILERS),
        (libc::IFF_MASTER as u64, InterfaceFlags::MASTER),
        (libc::IFF_SLAVE as u64, InterfaceFlags::SLAVE),
        (libc::IFF_PORTSEL as u64, InterfaceFlags::PORTSEL),
        (libc::IFF_AUTOMEDIA as u64, InterfaceFlags::AUTOMEDIA),
        (libc::IFF_DYNAMIC as u64, InterfaceFlags::DYNAMIC),
    ];

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    const PLATFORM: &[(u64, InterfaceFlags)] = &[];

    COMMON
        .iter()
        .chain(PLATFORM)
        .filter(|(native, _)| raw & native != 0)
        .fold(InterfaceFlags::empty(), |flags, (_, flag)| flags | *flag)
}

#[cfg(any(target_os = "linux", target_os = "android"))]
const LINK_FAMILY: Option<u16> = Some(libc::AF_PACKET as u16);

#[cfg(any(
    target_vendor = "apple",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
))]
const LINK_FAMILY: Option<u16> = Some(libc::AF_LINK as u16);

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_vendor = "apple",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
)))]
const LINK_FAMILY: Option<u16> = None;

fn is_link_family(tag: u16) -> bool {
    LINK_FAMILY == Some(tag)
}

/// Reads the hardware address out of a link-layer sockaddr.
#[cfg(any(target_os = "linux", target_os = "android"))]
unsafe fn link_address(addr: &libc::sockaddr) -> Option<MacAddr> {
    let sll = &*(addr as *const libc::sockaddr as *const libc::sockaddr_ll);
    let len = (sll.sll_halen as usize).min(sll.sll_addr.len());
    MacAddr::from_bytes(&sll.sll_addr[..len])
}

#[cfg(any(
    target_vendor = "apple",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
))]
unsafe fn link_address(addr: &libc::sockaddr) -> Option<MacAddr> {
    let sdl = addr as *const libc::sockaddr as *const libc::sockaddr_dl;
    let mac_offset = (*sdl).sdl_nlen as usize;
    let mac_len = (*sdl).sdl_alen as usize;
    if mac_len != 6 {
        return None;
    }
    let mac_ptr = (*sdl).sdl_data.as_ptr().add(mac_offset) as *const u8;
    MacAddr::from_bytes(std::slice::from_raw_parts(mac_ptr, mac_len))
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_vendor = "apple",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
)))]
unsafe fn link_address(_addr: &libc::sockaddr) -> Option<MacAddr> {
    None
}

/// Copies the address bytes out of `sa`, reading it as `family`.
///
/// The family comes from the record's address, not from `sa` itself: some
/// platforms leave `sa_family` unset on netmask sockaddrs. Returns `None` for
/// a null pointer or a family without a known address layout.
pub(crate) unsafe fn sockaddr_bytes(
    sa: *const libc::sockaddr,
    family: AddressFamily,
) -> Option<Vec<u8>> {
    if sa.is_null() {
        return None;
    }
    match family {
        AddressFamily::V4 => {
            let addr_in = sa as *const libc::sockaddr_in;
            Some((*addr_in).sin_addr.s_addr.to_ne_bytes().to_vec())
        }
        AddressFamily::V6 => {
            let addr_in6 = sa as *const libc::sockaddr_in6;
            Some((*addr_in6).sin6_addr.s6_addr.to_vec())
        }
        AddressFamily::Other(_) => None,
    }
}

pub fn _if_indextoname(index: InterfaceIndex) -> std::io::Result<String> {
    let mut buffer = vec![0u8; libc::IF_NAMESIZE];
    let result = unsafe {
        libc::if_indextoname(
            index as libc::c_uint,
            buffer.as_mut_ptr() as *mut libc::c_char,
        )
    };
    if result.is_null() {
        Err(std::io::Error::last_os_error())
    } else {
        Ok(unsafe { CStr::from_ptr(result) }
            .to_string_lossy()
            .into_owned())
    }
}

pub fn _if_nametoindex(name: impl AsRef<str>) -> std::io::Result<InterfaceIndex> {
    let name_cstr = std::ffi::CString::new(name.as_ref()).map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Invalid interface name")
    })?;
    let result = unsafe { libc::if_nametoindex(name_cstr.as_ptr()) };
    if result == 0 {
        Err(std::io::Error::last_os_error())
    } else {
        Ok(result as _)
    }
}
