//! Kernel interface flags and their decoding into named, ordered flags.

use std::fmt;

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Flags representing the status and capabilities of a network interface.
    ///
    /// The bit layout follows the Linux `IFF_*` values. Platform adapters
    /// translate their native mask into this layout, so a given flag always
    /// occupies the same bit regardless of the host OS.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct InterfaceFlags: u32 {
        /// The interface is administratively up.
        const UP = 0x1;
        /// A valid broadcast address is set.
        const BROADCAST = 0x2;
        /// Kernel debug tracing is enabled.
        const DEBUG = 0x4;
        /// The interface is a loopback interface.
        const LOOPBACK = 0x8;
        /// The interface is a point-to-point link.
        const POINTOPOINT = 0x10;
        /// Trailer encapsulation is avoided.
        const NOTRAILERS = 0x20;
        /// Resources are allocated and the link is operational.
        const RUNNING = 0x40;
        /// No ARP protocol on this link.
        const NOARP = 0x80;
        /// Promiscuous mode is active.
        const PROMISC = 0x100;
        /// Receives all multicast packets.
        const ALLMULTI = 0x200;
        /// Master of a load balancing bundle.
        const MASTER = 0x400;
        /// Slave of a load balancing bundle.
        const SLAVE = 0x800;
        /// The interface supports multicast.
        const MULTICAST = 0x1000;
        /// The media type can be selected.
        const PORTSEL = 0x2000;
        /// Automatic media selection is active.
        const AUTOMEDIA = 0x4000;
        /// Addresses are lost when the interface goes down.
        const DYNAMIC = 0x8000;
    }
}

impl InterfaceFlags {
    /// Builds a flag set from a raw mask, dropping bits without a known flag.
    pub fn from_mask(mask: u32) -> Self {
        InterfaceFlags::from_bits_truncate(mask)
    }

    /// Returns the active flags in canonical display order.
    pub fn names(self) -> Vec<FlagName> {
        decode(self)
    }
}

/// The name of a single interface flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagName {
    /// Names [`InterfaceFlags::UP`].
    Up,
    /// Names [`InterfaceFlags::BROADCAST`].
    Broadcast,
    /// Names [`InterfaceFlags::DEBUG`].
    Debug,
    /// Names [`InterfaceFlags::LOOPBACK`].
    Loopback,
    /// Names [`InterfaceFlags::POINTOPOINT`].
    #[serde(rename = "POINTOPOINT")]
    PointToPoint,
    /// Names [`InterfaceFlags::RUNNING`].
    Running,
    /// Names [`InterfaceFlags::NOARP`].
    #[serde(rename = "NOARP")]
    NoArp,
    /// Names [`InterfaceFlags::PROMISC`].
    Promisc,
    /// Names [`InterfaceFlags::NOTRAILERS`].
    #[serde(rename = "NOTRAILERS")]
    NoTrailers,
    /// Names [`InterfaceFlags::ALLMULTI`].
    #[serde(rename = "ALLMULTI")]
    AllMulti,
    /// Names [`InterfaceFlags::MASTER`].
    Master,
    /// Names [`InterfaceFlags::SLAVE`].
    Slave,
    /// Names [`InterfaceFlags::MULTICAST`].
    Multicast,
    /// Names [`InterfaceFlags::PORTSEL`].
    #[serde(rename = "PORTSEL")]
    PortSel,
    /// Names [`InterfaceFlags::AUTOMEDIA`].
    #[serde(rename = "AUTOMEDIA")]
    AutoMedia,
    /// Names [`InterfaceFlags::DYNAMIC`].
    Dynamic,
}

impl FlagName {
    /// The upper-case flag name, as `ifconfig` prints it.
    pub fn as_str(self) -> &'static str {
        match self {
            FlagName::Up => "UP",
            FlagName::Broadcast => "BROADCAST",
            FlagName::Debug => "DEBUG",
            FlagName::Loopback => "LOOPBACK",
            FlagName::PointToPoint => "POINTOPOINT",
            FlagName::Running => "RUNNING",
            FlagName::NoArp => "NOARP",
            FlagName::Promisc => "PROMISC",
            FlagName::NoTrailers => "NOTRAILERS",
            FlagName::AllMulti => "ALLMULTI",
            FlagName::Master => "MASTER",
            FlagName::Slave => "SLAVE",
            FlagName::Multicast => "MULTICAST",
            FlagName::PortSel => "PORTSEL",
            FlagName::AutoMedia => "AUTOMEDIA",
            FlagName::Dynamic => "DYNAMIC",
        }
    }

    /// A short human-readable meaning of the flag.
    pub fn description(self) -> &'static str {
        match self {
            FlagName::Up => "administratively enabled",
            FlagName::Broadcast => "valid broadcast address configured",
            FlagName::Debug => "kernel debug tracing enabled",
            FlagName::Loopback => "loopback interface",
            FlagName::PointToPoint => "point-to-point link",
            FlagName::Running => "resources allocated, link operational",
            FlagName::NoArp => "no ARP protocol in use",
            FlagName::Promisc => "promiscuous mode active",
            FlagName::NoTrailers => "trailer encapsulation disabled",
            FlagName::AllMulti => "receives all multicast traffic",
            FlagName::Master => "load balancing bundle master",
            FlagName::Slave => "load balancing bundle slave",
            FlagName::Multicast => "multicast capable",
            FlagName::PortSel => "media type selectable",
            FlagName::AutoMedia => "automatic media selection active",
            FlagName::Dynamic => "addresses lost when the link goes down",
        }
    }
}

impl fmt::Display for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every known flag, in the order a report lists them: operational status
/// first, then addressing, then media and bonding, then the rest.
pub const FLAG_TABLE: [(InterfaceFlags, FlagName); 16] = [
    (InterfaceFlags::UP, FlagName::Up),
    (InterfaceFlags::BROADCAST, FlagName::Broadcast),
    (InterfaceFlags::DEBUG, FlagName::Debug),
    (InterfaceFlags::LOOPBACK, FlagName::Loopback),
    (InterfaceFlags::POINTOPOINT, FlagName::PointToPoint),
    (InterfaceFlags::RUNNING, FlagName::Running),
    (InterfaceFlags::NOARP, FlagName::NoArp),
    (InterfaceFlags::PROMISC, FlagName::Promisc),
    (InterfaceFlags::NOTRAILERS, FlagName::NoTrailers),
    (InterfaceFlags::ALLMULTI, FlagName::AllMulti),
    (InterfaceFlags::MASTER, FlagName::Master),
    (InterfaceFlags::SLAVE, FlagName::Slave),
    (InterfaceFlags::MULTICAST, FlagName::Multicast),
    (InterfaceFlags::PORTSEL, FlagName::PortSel),
    (InterfaceFlags::AUTOMEDIA, FlagName::AutoMedia),
    (InterfaceFlags::DYNAMIC, FlagName::Dynamic),
];

/// Decodes a flag set into the names of its active flags, in
/// [`FLAG_TABLE`] order.
pub fn decode(flags: InterfaceFlags) -> Vec<FlagName> {
    FLAG_TABLE
        .iter()
        .filter(|(bit, _)| flags.contains(*bit))
        .map(|(_, name)| *name)
        .collect()
}
