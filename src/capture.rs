//! Interface enumeration through libpcap's device list.

use std::net::IpAddr;

use log::debug;
use pcap::{Device, IfFlags};

use crate::{classify, AddressFamily, Enumerate, Error, Interface, InterfaceFlags, Result};

/// Enumerates interfaces with `pcap_findalldevs`.
///
/// libpcap only reports IPv4 and IPv6 addresses and its own status bits, so
/// interfaces from this backend carry no hardware address and only the `UP`,
/// `RUNNING` and `LOOPBACK` flags, plus `BROADCAST` and `POINTOPOINT` when an
/// address reports a broadcast or peer address.
#[derive(Debug, Default, Clone, Copy)]
pub struct PcapEnumerator;

impl Enumerate for PcapEnumerator {
    fn name(&self) -> &'static str {
        "pcap"
    }

    fn enumerate(&self) -> Result<Vec<Interface>> {
        let devices = Device::list().map_err(|err| Error::enumeration(err.to_string()))?;
        debug!("libpcap reported {} devices", devices.len());
        Ok(devices.into_iter().map(Interface::from).collect())
    }
}

impl From<Device> for Interface {
    fn from(device: Device) -> Self {
        let mut interface = Interface::new(device.name);

        #[cfg(unix)]
        {
            interface.index = crate::unix::_if_nametoindex(&interface.name).ok();
        }

        let if_flags = device.flags.if_flags;
        for (pcap_flag, flag) in [
            (IfFlags::UP, InterfaceFlags::UP),
            (IfFlags::RUNNING, InterfaceFlags::RUNNING),
            (IfFlags::LOOPBACK, InterfaceFlags::LOOPBACK),
        ] {
            if if_flags.contains(pcap_flag) {
                interface.flags |= flag;
            }
        }

        for addr in device.addresses {
            let netmask = addr.netmask.map(octets);
            let mut address = classify(
                family_of(addr.addr),
                &octets(addr.addr),
                netmask.as_deref(),
            );
            if let Some(broadcast) = addr.broadcast_addr {
                interface.flags |= InterfaceFlags::BROADCAST;
                address = address.with_broadcast(Some(octets(broadcast).as_slice()));
            } else if let Some(destination) = addr.dst_addr {
                interface.flags |= InterfaceFlags::POINTOPOINT;
                address = address.with_destination(Some(octets(destination).as_slice()));
            }
            interface.addresses.push(address);
        }

        interface
    }
}

fn family_of(ip: IpAddr) -> AddressFamily {
    match ip {
        IpAddr::V4(_) => AddressFamily::V4,
        IpAddr::V6(_) => AddressFamily::V6,
    }
}

fn octets(ip: IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(ip) => ip.octets().to_vec(),
        IpAddr::V6(ip) => ip.octets().to_vec(),
    }
}
