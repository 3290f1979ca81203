//! Interface enumeration through `SIOCGIF*` ioctls on a control socket.
//!
//! `SIOCGIFCONF` returns one record per IPv4 address. Records are folded into
//! one interface per name, and each name is then queried once for its
//! netmask, broadcast or peer address, hardware address and flags. Only the
//! record list is mandatory. Every other per-interface query degrades to a
//! missing field when it fails.

use std::io;
use std::mem::size_of;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd};

use log::{debug, trace};

use crate::unix::{_if_nametoindex, native_flags, sockaddr_bytes};
use crate::{
    classify, AddressFamily, Enumerate, Error, Interface, InterfaceFlags, MacAddr, Result,
};

/// Start with room for this many `ifreq` records and double on overflow.
const INITIAL_RECORDS: usize = 16;
/// Give up growing the `SIOCGIFCONF` buffer past this many records.
const MAX_RECORDS: usize = 1 << 14;

/// Enumerates interfaces with ioctls on a throwaway `AF_INET` datagram socket.
///
/// The socket lives only for the duration of [`Enumerate::enumerate`] and is
/// closed on every return path.
#[derive(Debug, Default, Clone, Copy)]
pub struct IoctlEnumerator;

impl Enumerate for IoctlEnumerator {
    fn name(&self) -> &'static str {
        "ioctl"
    }

    fn enumerate(&self) -> Result<Vec<Interface>> {
        let socket = control_socket()?;
        enumerate_on(socket.as_fd())
    }
}

fn control_socket() -> Result<OwnedFd> {
    let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM | libc::SOCK_CLOEXEC, 0) };
    if fd < 0 {
        return Err(Error::last_os_error());
    }
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

fn enumerate_on(fd: BorrowedFd<'_>) -> Result<Vec<Interface>> {
    let records = interface_records(fd)?;
    debug!("SIOCGIFCONF reported {} records", records.len());
    Ok(group_records(&records)
        .into_iter()
        .map(|(name, addresses)| describe(fd, name, addresses))
        .collect())
}

/// Folds `SIOCGIFCONF` records into one entry per name, in first-seen order,
/// keeping every record's IPv4 address.
fn group_records(records: &[IfReq]) -> Vec<(String, Vec<Vec<u8>>)> {
    let mut grouped: Vec<(String, Vec<Vec<u8>>)> = Vec::new();
    for record in records {
        let name = record.name();
        let position = match grouped.iter().position(|(n, _)| *n == name) {
            Some(position) => position,
            None => {
                grouped.push((name, Vec::new()));
                grouped.len() - 1
            }
        };
        match record.ipv4() {
            Some(bytes) => grouped[position].1.push(bytes),
            None => trace!("{}: record without an address", grouped[position].0),
        }
    }
    grouped
}

/// `struct ifreq`, restricted to the union members used here.
#[repr(C)]
#[derive(Clone, Copy)]
struct IfReq {
    name: [libc::c_char; libc::IFNAMSIZ],
    data: IfReqData,
}

#[repr(C)]
#[derive(Clone, Copy)]
union IfReqData {
    addr: libc::sockaddr,
    flags: libc::c_short,
    // Sizes the union like `struct ifmap`, its largest member.
    _map: [libc::c_ulong; 3],
}

/// `struct ifconf` with the buffer viewed as `ifreq` records.
#[repr(C)]
struct IfConf {
    len: libc::c_int,
    req: *mut IfReq,
}

impl IfReq {
    fn zeroed() -> Self {
        // All-zero is a valid `ifreq`.
        unsafe { std::mem::zeroed() }
    }

    fn for_name(name: &str) -> Self {
        let mut req = IfReq::zeroed();
        // Leave room for the terminating NUL.
        for (dst, src) in req.name[..libc::IFNAMSIZ - 1].iter_mut().zip(name.bytes()) {
            *dst = src as libc::c_char;
        }
        req
    }

    fn name(&self) -> String {
        let bytes: Vec<u8> = self
            .name
            .iter()
            .map(|&c| c as u8)
            .take_while(|&b| b != 0)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn ipv4(&self) -> Option<Vec<u8>> {
        unsafe { sockaddr_bytes(&self.data.addr, AddressFamily::V4) }
    }

    fn hardware_address(&self) -> Option<MacAddr> {
        let data = unsafe { self.data.addr.sa_data };
        let bytes: [u8; 6] = std::array::from_fn(|i| data[i] as u8);
        MacAddr::from_bytes(&bytes)
    }

    fn flags(&self) -> InterfaceFlags {
        // ifr_flags is a short; keep its bit pattern
        native_flags(unsafe { self.data.flags } as u16 as u64)
    }
}

/// Issues one `SIOCGIF*` request for `name`.
fn query(fd: BorrowedFd<'_>, request: libc::c_ulong, name: &str) -> io::Result<IfReq> {
    let mut req = IfReq::for_name(name);
    let result = unsafe { libc::ioctl(fd.as_raw_fd(), request as _, &mut req as *mut IfReq) };
    if result < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(req)
}

/// Lists the per-address records with `SIOCGIFCONF`, growing the buffer until
/// the kernel's answer fits with room to spare.
fn interface_records(fd: BorrowedFd<'_>) -> Result<Vec<IfReq>> {
    let mut capacity = INITIAL_RECORDS;
    loop {
        let mut records: Vec<IfReq> = Vec::new();
        records.try_reserve_exact(capacity)?;
        records.resize(capacity, IfReq::zeroed());

        let mut conf = IfConf {
            len: (capacity * size_of::<IfReq>()) as libc::c_int,
            req: records.as_mut_ptr(),
        };
        let result = unsafe {
            libc::ioctl(
                fd.as_raw_fd(),
                libc::SIOCGIFCONF as _,
                &mut conf as *mut IfConf,
            )
        };
        if result < 0 {
            return Err(Error::last_os_error());
        }

        let used = conf.len.max(0) as usize / size_of::<IfReq>();
        if used < capacity {
            records.truncate(used);
            return Ok(records);
        }
        if capacity >= MAX_RECORDS {
            return Err(Error::enumeration(format!(
                "interface list does not fit in {MAX_RECORDS} records"
            )));
        }
        capacity *= 2;
    }
}

/// Builds one interface from its `SIOCGIFCONF` addresses and the per-name
/// queries.
///
/// The netmask and broadcast or peer queries answer for the primary address
/// only, the one `SIOCGIFADDR` returns. Secondary addresses carry no netmask.
fn describe(fd: BorrowedFd<'_>, name: String, addresses: Vec<Vec<u8>>) -> Interface {
    let mut interface = Interface::new(name);
    let name = interface.name.as_str();

    // Alias labels such as eth0:1 have no index of their own
    interface.index = _if_nametoindex(name).ok();

    interface.flags = match query(fd, libc::SIOCGIFFLAGS as _, name) {
        Ok(req) => req.flags(),
        Err(err) => {
            debug!("{name}: SIOCGIFFLAGS failed: {err}");
            InterfaceFlags::empty()
        }
    };

    let primary = match query(fd, libc::SIOCGIFADDR as _, name) {
        Ok(req) => req.ipv4(),
        Err(err) => {
            debug!("{name}: SIOCGIFADDR failed: {err}");
            None
        }
    };

    for bytes in addresses {
        if primary.as_deref() != Some(bytes.as_slice()) {
            let address = classify(AddressFamily::V4, &bytes, None);
            interface.addresses.push(address);
            continue;
        }

        let netmask = match query(fd, libc::SIOCGIFNETMASK as _, name) {
            Ok(req) => req.ipv4(),
            Err(err) => {
                debug!("{name}: SIOCGIFNETMASK failed: {err}");
                None
            }
        };
        let mut address = classify(AddressFamily::V4, &bytes, netmask.as_deref());

        if interface.flags.contains(InterfaceFlags::BROADCAST) {
            let broadcast = broadcast_bytes(name, query(fd, libc::SIOCGIFBRDADDR as _, name));
            address = address.with_broadcast(Some(broadcast.as_slice()));
        } else if interface.flags.contains(InterfaceFlags::POINTOPOINT) {
            match query(fd, libc::SIOCGIFDSTADDR as _, name) {
                Ok(req) => address = address.with_destination(req.ipv4().as_deref()),
                Err(err) => debug!("{name}: SIOCGIFDSTADDR failed: {err}"),
            }
        }

        interface.addresses.push(address);
    }

    match query(fd, libc::SIOCGIFHWADDR as _, name) {
        Ok(req) => interface.hardware_address = req.hardware_address(),
        Err(err) => debug!("{name}: SIOCGIFHWADDR failed: {err}"),
    }

    interface
}

/// The broadcast address from a `SIOCGIFBRDADDR` answer; `0.0.0.0` when the
/// lookup failed.
fn broadcast_bytes(name: &str, answer: io::Result<IfReq>) -> Vec<u8> {
    let broadcast = match answer {
        Ok(req) => req.ipv4(),
        Err(err) => {
            debug!("{name}: SIOCGIFBRDADDR failed: {err}");
            None
        }
    };
    broadcast.unwrap_or_else(|| vec![0; 4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Address, Reporter};
    use std::fs::File;
    use std::net::{IpAddr, Ipv4Addr};

    fn record(name: &str, ip: [u8; 4]) -> IfReq {
        let mut req = IfReq::for_name(name);
        let sin = libc::sockaddr_in {
            sin_family: libc::AF_INET as _,
            sin_port: 0,
            sin_addr: libc::in_addr {
                s_addr: u32::from_ne_bytes(ip),
            },
            sin_zero: [0; 8],
        };
        unsafe {
            std::ptr::addr_of_mut!(req.data.addr)
                .cast::<libc::sockaddr_in>()
                .write(sin);
        }
        req
    }

    #[test]
    fn test_ifreq_layout() {
        #[cfg(target_pointer_width = "64")]
        assert_eq!(size_of::<IfReq>(), 40);
        #[cfg(target_pointer_width = "32")]
        assert_eq!(size_of::<IfReq>(), 32);
    }

    #[test]
    fn test_ifreq_name() {
        let req = IfReq::for_name("eth0");
        assert_eq!(req.name(), "eth0");

        // Overlong names are cut and stay NUL-terminated
        let long = "x".repeat(40);
        let req = IfReq::for_name(&long);
        assert_eq!(req.name(), "x".repeat(libc::IFNAMSIZ - 1));
        assert_eq!(req.name[libc::IFNAMSIZ - 1], 0);
    }

    #[test]
    fn test_group_records() {
        let records = [
            record("lo", [127, 0, 0, 1]),
            record("eth0", [192, 0, 2, 2]),
            record("lo", [127, 0, 0, 2]),
        ];
        let grouped = group_records(&records);
        assert_eq!(
            grouped,
            [
                ("lo".to_owned(), vec![vec![127, 0, 0, 1], vec![127, 0, 0, 2]]),
                ("eth0".to_owned(), vec![vec![192, 0, 2, 2]]),
            ]
        );
    }

    #[test]
    fn test_broadcast_fallback() {
        assert_eq!(
            broadcast_bytes("eth0", Ok(record("eth0", [192, 0, 2, 255]))),
            [192, 0, 2, 255]
        );

        let failed = Err(io::Error::from_raw_os_error(libc::EADDRNOTAVAIL));
        let broadcast = broadcast_bytes("eth0", failed);
        let address = classify(AddressFamily::V4, &[192, 0, 2, 2], None)
            .with_broadcast(Some(broadcast.as_slice()));
        assert_eq!(address.broadcast(), Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED)));

        let mut eth = Interface::new("eth0");
        eth.flags = InterfaceFlags::BROADCAST;
        eth.addresses.push(address);
        let mut reporter = Reporter::new(Vec::new(), "ioctl");
        reporter.write_interface(1, &eth).unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("\t\t# BROADCAST >> 0.0.0.0\n"), "{text}");
    }

    #[test]
    fn test_not_a_socket() {
        let file = File::open("/dev/null").unwrap();
        match enumerate_on(file.as_fd()) {
            Err(Error::Enumeration { reason }) => assert!(!reason.is_empty()),
            other => panic!("Expected an enumeration error, got {other:?}"),
        }
    }

    #[test]
    fn test_loopback() {
        let interfaces = IoctlEnumerator.enumerate().unwrap();
        for interface in &interfaces {
            eprintln!("{interface:#?}");
        }

        for (i, interface) in interfaces.iter().enumerate() {
            assert!(
                interfaces[i + 1..].iter().all(|o| o.name != interface.name),
                "Duplicate interface {}",
                interface.name
            );
        }

        let loopback: Vec<_> = interfaces.iter().filter(|i| i.is_loopback()).collect();
        assert_eq!(loopback.len(), 1);
        let lo = loopback[0];
        assert!(!lo.addresses.is_empty());
        assert_eq!(lo.addresses[0], IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(
            lo.addresses[0].netmask(),
            Some(IpAddr::V4(Ipv4Addr::new(255, 0, 0, 0)))
        );
        assert_eq!(lo.hardware_address, None);
    }

    #[test]
    fn test_broadcast_follows_flag() {
        for interface in IoctlEnumerator.enumerate().unwrap() {
            assert!(interface.addresses.iter().all(Address::is_ipv4));
            // Only the primary address carries a netmask and broadcast
            for address in interface.addresses.iter().filter(|a| a.netmask().is_some()) {
                assert_eq!(
                    address.broadcast().is_some(),
                    interface.flags.contains(InterfaceFlags::BROADCAST),
                    "{}",
                    interface.name
                );
            }
        }
    }
}
