#![doc=include_str!("../README.md")]

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

use serde::Serialize;

mod classify;
mod error;
mod flags;
mod report;

#[cfg(unix)]
mod unix;

#[cfg(any(target_os = "linux", target_os = "android"))]
mod ioctl;

#[cfg(feature = "pcap")]
mod capture;

pub use classify::classify;
pub use error::{Error, Result};
pub use flags::{decode, FlagName, InterfaceFlags, FLAG_TABLE};
pub use report::{banner, ReportStyle, Reporter};

#[cfg(unix)]
pub use unix::IfaddrsEnumerator;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use ioctl::IoctlEnumerator;

#[cfg(feature = "pcap")]
pub use capture::PcapEnumerator;

/// This represents the index of a network interface.
pub type InterfaceIndex = u32;

/// A source of interface lists.
///
/// Each acquisition strategy (getifaddrs, socket ioctls, libpcap) implements
/// this trait. Any OS handle used for the query is released before
/// `enumerate` returns, on success and on failure.
pub trait Enumerate {
    /// A short name for the strategy, shown in the report banner.
    fn name(&self) -> &'static str;

    /// Returns the interfaces visible to this process, in the order the OS
    /// reports them.
    ///
    /// A host without interfaces yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Enumeration`] when the OS query itself fails.
    fn enumerate(&self) -> Result<Vec<Interface>>;
}

/// The available acquisition strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Walk the `getifaddrs(3)` list.
    #[default]
    Ifaddrs,
    /// Query the kernel with `SIOCGIF*` ioctls on a control socket.
    Ioctl,
    /// Ask libpcap for its device list.
    Pcap,
}

impl Backend {
    /// Every backend, whether or not it is compiled in.
    pub const ALL: [Backend; 3] = [Backend::Ifaddrs, Backend::Ioctl, Backend::Pcap];

    /// The name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Ifaddrs => "ifaddrs",
            Backend::Ioctl => "ioctl",
            Backend::Pcap => "pcap",
        }
    }

    /// Returns the enumerator implementing this backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] when the backend is not available for
    /// this target or was not enabled at build time.
    pub fn enumerator(self) -> Result<Box<dyn Enumerate>> {
        match self {
            #[cfg(unix)]
            Backend::Ifaddrs => Ok(Box::new(IfaddrsEnumerator)),
            #[cfg(any(target_os = "linux", target_os = "android"))]
            Backend::Ioctl => Ok(Box::new(IoctlEnumerator)),
            #[cfg(feature = "pcap")]
            Backend::Pcap => Ok(Box::new(PcapEnumerator)),
            #[allow(unreachable_patterns)]
            other => Err(Error::Unsupported(other.as_str())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|backend| backend.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = Backend::ALL.iter().map(|b| b.as_str()).collect();
                format!("unknown backend '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// A link-layer (Ethernet) hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Builds an address from the first six bytes of `bytes`, or `None` if
    /// there are fewer than six or they are all zero.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let octets: [u8; 6] = bytes.get(..6)?.try_into().ok()?;
        if octets == [0u8; 6] {
            None
        } else {
            Some(MacAddr(octets))
        }
    }

    /// Returns the raw octets.
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Whether an interface has any address assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// At least one address is assigned.
    Configured,
    /// No address is assigned.
    NotConfigured,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Configured => "CONFIGURED",
            Status::NotConfigured => "!CONFIGURED",
        })
    }
}

/// Represents a network interface.
///
/// This struct contains information about a network interface, including its
/// name, index, addresses, flags and hardware address. Addresses keep the
/// order the OS reported them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// The name of the interface.
    pub name: String,
    /// The index of the interface, if available.
    pub index: Option<InterfaceIndex>,
    /// The addresses assigned to the interface.
    pub addresses: Vec<Address>,
    /// The flags indicating the interface's properties and state.
    pub flags: InterfaceFlags,
    /// The link-layer address, if the interface reports one.
    pub hardware_address: Option<MacAddr>,
}

impl Interface {
    /// Creates an interface with no addresses and no flags.
    pub fn new(name: impl Into<String>) -> Self {
        Interface {
            name: name.into(),
            index: None,
            addresses: Vec::new(),
            flags: InterfaceFlags::empty(),
            hardware_address: None,
        }
    }

    /// Returns [`Status::Configured`] if at least one address is assigned.
    pub fn status(&self) -> Status {
        if self.addresses.is_empty() {
            Status::NotConfigured
        } else {
            Status::Configured
        }
    }

    /// Returns the names of the active flags, in display order.
    pub fn flag_names(&self) -> Vec<FlagName> {
        decode(self.flags)
    }

    /// Returns `true` if this is a loopback interface.
    pub fn is_loopback(&self) -> bool {
        self.flags.contains(InterfaceFlags::LOOPBACK)
    }
}

/// Represents a network address family.
///
/// Families other than IPv4 and IPv6 keep their raw OS tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressFamily {
    /// An IPv4 address.
    V4,
    /// An IPv6 address.
    V6,
    /// Any other family, with its raw tag.
    Other(u16),
}

#[cfg(unix)]
const AF_INET: u16 = libc::AF_INET as u16;
#[cfg(unix)]
const AF_INET6: u16 = libc::AF_INET6 as u16;
#[cfg(windows)]
const AF_INET: u16 = 2;
#[cfg(windows)]
const AF_INET6: u16 = 23;

impl AddressFamily {
    /// Maps a raw `sa_family` tag to a family.
    pub fn from_raw(tag: u16) -> Self {
        match tag {
            AF_INET => AddressFamily::V4,
            AF_INET6 => AddressFamily::V6,
            other => AddressFamily::Other(other),
        }
    }

    /// Returns the raw `sa_family` tag.
    pub fn raw(self) -> u16 {
        match self {
            AddressFamily::V4 => AF_INET,
            AddressFamily::V6 => AF_INET6,
            AddressFamily::Other(tag) => tag,
        }
    }

    /// The number of address bytes this family carries, if known.
    pub fn address_len(self) -> Option<usize> {
        match self {
            AddressFamily::V4 => Some(4),
            AddressFamily::V6 => Some(16),
            AddressFamily::Other(_) => None,
        }
    }

    /// A lower-case identifier for structured output.
    pub fn as_str(self) -> &'static str {
        match self {
            AddressFamily::V4 => "ipv4",
            AddressFamily::V6 => "ipv6",
            AddressFamily::Other(_) => "other",
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("IPv4"),
            AddressFamily::V6 => f.write_str("IPv6"),
            AddressFamily::Other(_) => f.write_str("????"),
        }
    }
}

/// Represents a network address of a given family.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Address {
    /// An IPv4 address.
    V4(NetworkAddress<Ipv4Addr>),
    /// An IPv6 address.
    V6(NetworkAddress<Ipv6Addr>),
    /// An address of a family this crate does not parse, with its raw tag.
    Other(u16),
}

impl Address {
    /// Returns `true` if the address is an IPv4 address.
    pub fn is_ipv4(&self) -> bool {
        matches!(self, Address::V4(_))
    }

    /// Returns `true` if the address is an IPv6 address.
    pub fn is_ipv6(&self) -> bool {
        matches!(self, Address::V6(_))
    }

    /// Returns the address family of the address.
    pub fn family(&self) -> AddressFamily {
        match self {
            Address::V4(_) => AddressFamily::V4,
            Address::V6(_) => AddressFamily::V6,
            Address::Other(tag) => AddressFamily::Other(*tag),
        }
    }

    /// Returns the IP address, if this is an IPv4 or IPv6 address.
    pub fn ip_addr(&self) -> Option<IpAddr> {
        match self {
            Address::V4(addr) => Some(IpAddr::V4(addr.address)),
            Address::V6(addr) => Some(IpAddr::V6(addr.address)),
            Address::Other(_) => None,
        }
    }

    /// Returns the netmask, if the OS supplied one.
    pub fn netmask(&self) -> Option<IpAddr> {
        match self {
            Address::V4(addr) => addr.netmask.map(IpAddr::V4),
            Address::V6(addr) => addr.netmask.map(IpAddr::V6),
            Address::Other(_) => None,
        }
    }

    /// Returns the broadcast address, if the interface has one.
    pub fn broadcast(&self) -> Option<IpAddr> {
        match self {
            Address::V4(addr) => addr.broadcast.map(IpAddr::V4),
            Address::V6(addr) => addr.broadcast.map(IpAddr::V6),
            Address::Other(_) => None,
        }
    }

    /// Returns the peer address of a point-to-point link.
    pub fn destination(&self) -> Option<IpAddr> {
        match self {
            Address::V4(addr) => addr.destination.map(IpAddr::V4),
            Address::V6(addr) => addr.destination.map(IpAddr::V6),
            Address::Other(_) => None,
        }
    }

    /// Attaches a broadcast address parsed with this address's own family.
    /// A missing or malformed buffer leaves the address unchanged.
    pub fn with_broadcast(mut self, raw: Option<&[u8]>) -> Self {
        match &mut self {
            Address::V4(addr) => addr.broadcast = raw.and_then(classify::ipv4).or(addr.broadcast),
            Address::V6(addr) => addr.broadcast = raw.and_then(classify::ipv6).or(addr.broadcast),
            Address::Other(_) => {}
        }
        self
    }

    /// Attaches a point-to-point peer address parsed with this address's own
    /// family. A missing or malformed buffer leaves the address unchanged.
    pub fn with_destination(mut self, raw: Option<&[u8]>) -> Self {
        match &mut self {
            Address::V4(addr) => {
                addr.destination = raw.and_then(classify::ipv4).or(addr.destination)
            }
            Address::V6(addr) => {
                addr.destination = raw.and_then(classify::ipv6).or(addr.destination)
            }
            Address::Other(_) => {}
        }
        self
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::V4(addr) => fmt::Display::fmt(&addr.address, f),
            Address::V6(addr) => fmt::Display::fmt(&addr.address, f),
            Address::Other(tag) => write!(f, "<unknown family {tag}>"),
        }
    }
}

impl PartialEq<IpAddr> for Address {
    fn eq(&self, other: &IpAddr) -> bool {
        match self {
            Address::V4(addr) => addr.address == *other,
            Address::V6(addr) => addr.address == *other,
            Address::Other(_) => false,
        }
    }
}

mod sealed {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    /// A trait for types that can be converted to `IpAddr`.
    pub trait NetworkAddressable: Into<IpAddr> {}

    impl NetworkAddressable for Ipv4Addr {}
    impl NetworkAddressable for Ipv6Addr {}
}

/// An IP address together with the addresses the OS associates with it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetworkAddress<T: sealed::NetworkAddressable> {
    /// The address assigned to the interface.
    pub address: T,
    /// The netmask associated with the address.
    pub netmask: Option<T>,
    /// The broadcast address, for interfaces flagged `BROADCAST`.
    pub broadcast: Option<T>,
    /// The peer address, for interfaces flagged `POINTOPOINT`.
    pub destination: Option<T>,
}

impl<T: sealed::NetworkAddressable> NetworkAddress<T> {
    /// Creates an address with an optional netmask and no associated
    /// addresses.
    pub fn new(address: T, netmask: Option<T>) -> Self {
        NetworkAddress {
            address,
            netmask,
            broadcast: None,
            destination: None,
        }
    }
}

enum InterfaceFilterCriteria {
    Loopback,
    Index(InterfaceIndex),
    Name(String),
}

/// A filter for network interfaces.
///
/// This struct allows you to specify criteria for filtering network interfaces.
/// You can chain multiple filter methods to narrow down the selection.
///
/// By default, this returns all interfaces with all of their addresses.
///
/// # Examples
///
/// ```
/// # use lsdev::{Backend, InterfaceFilter};
/// # fn main() -> lsdev::Result<()> {
/// // Get the loopback interface with its IPv4 addresses only
/// let loopback = InterfaceFilter::new().loopback().v4().get(Backend::Ifaddrs)?;
///
/// // Get a single interface by name
/// let lo = InterfaceFilter::new().name("lo").get(Backend::default())?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct InterfaceFilter {
    criteria: Option<InterfaceFilterCriteria>,
    address: Option<[bool; 3]>,
}

impl InterfaceFilter {
    /// Creates a new `InterfaceFilter` with no criteria set.
    pub fn new() -> Self {
        InterfaceFilter::default()
    }

    /// Filters for loopback interfaces.
    pub fn loopback(mut self) -> Self {
        self.criteria = Some(InterfaceFilterCriteria::Loopback);
        self
    }

    /// Filters for interfaces with the specified index.
    pub fn index(mut self, index: InterfaceIndex) -> Self {
        self.criteria = Some(InterfaceFilterCriteria::Index(index));
        self
    }

    /// Filters for interfaces with the specified name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.criteria = Some(InterfaceFilterCriteria::Name(name.into()));
        self
    }

    /// Filters addresses by family.
    ///
    /// The first family filter limits the returned addresses to that family;
    /// further family filters union with it. Once a family filter is set,
    /// interfaces left without any address are dropped.
    pub fn family(mut self, family: AddressFamily) -> Self {
        let address = self.address.get_or_insert([false; 3]);
        match family {
            AddressFamily::V4 => address[0] = true,
            AddressFamily::V6 => address[1] = true,
            AddressFamily::Other(_) => address[2] = true,
        }
        self
    }

    /// Filters for IPv4 addresses. Equivalent to `family(V4)`.
    pub fn v4(self) -> Self {
        self.family(AddressFamily::V4)
    }

    /// Filters for IPv6 addresses. Equivalent to `family(V6)`.
    pub fn v6(self) -> Self {
        self.family(AddressFamily::V6)
    }

    fn family_filter(&self, family: AddressFamily) -> bool {
        self.address
            .map(|address| {
                address[match family {
                    AddressFamily::V4 => 0,
                    AddressFamily::V6 => 1,
                    AddressFamily::Other(_) => 2,
                }]
            })
            .unwrap_or(true)
    }

    fn matches(&self, interface: &Interface) -> bool {
        match &self.criteria {
            None => true,
            Some(InterfaceFilterCriteria::Loopback) => interface.is_loopback(),
            Some(InterfaceFilterCriteria::Index(index)) => interface.index == Some(*index),
            Some(InterfaceFilterCriteria::Name(name)) => interface.name == *name,
        }
    }

    /// Applies the filter to an already enumerated list, keeping its order.
    pub fn apply(&self, interfaces: Vec<Interface>) -> Vec<Interface> {
        interfaces
            .into_iter()
            .filter(|interface| self.matches(interface))
            .filter_map(|mut interface| {
                if self.address.is_none() {
                    return Some(interface);
                }
                interface
                    .addresses
                    .retain(|address| self.family_filter(address.family()));
                (!interface.addresses.is_empty()).then_some(interface)
            })
            .collect()
    }

    /// Enumerates with the given backend and applies the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable or the enumeration
    /// fails.
    pub fn get(self, backend: Backend) -> Result<Vec<Interface>> {
        let interfaces = backend.enumerator()?.enumerate()?;
        Ok(self.apply(interfaces))
    }
}

/// Returns all network interfaces on the system using the default backend.
///
/// It is equivalent to calling `InterfaceFilter::new().get(Backend::default())`.
///
/// ```rust
/// # use lsdev::interfaces;
/// for interface in interfaces().unwrap() {
///     eprintln!("{}: {:?}", interface.name, interface.flag_names());
/// }
/// ```
pub fn interfaces() -> Result<Vec<Interface>> {
    InterfaceFilter::new().get(Backend::default())
}

/// Converts a network interface index to its corresponding name.
///
/// # Examples
///
/// ```
/// match lsdev::if_indextoname(1) {
///     Ok(name) => println!("Interface name: {}", name),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
#[cfg(unix)]
pub fn if_indextoname(index: InterfaceIndex) -> std::io::Result<String> {
    unix::_if_indextoname(index)
}

/// Converts a network interface name to its corresponding index.
///
/// Any name that parses as an [`InterfaceIndex`] is returned as-is.
///
/// # Examples
///
/// ```
/// match lsdev::if_nametoindex("lo") {
///     Ok(index) => println!("Interface index: {}", index),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
#[cfg(unix)]
pub fn if_nametoindex(name: impl AsRef<str>) -> std::io::Result<InterfaceIndex> {
    if let Ok(num) = name.as_ref().parse::<InterfaceIndex>() {
        return Ok(num);
    }
    unix::_if_nametoindex(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Interface> {
        let mut lo = Interface::new("lo");
        lo.index = Some(1);
        lo.flags = InterfaceFlags::UP | InterfaceFlags::LOOPBACK | InterfaceFlags::RUNNING;
        lo.addresses = vec![
            classify(AddressFamily::V4, &[127, 0, 0, 1], Some(&[255, 0, 0, 0][..])),
            classify(AddressFamily::V6, &Ipv6Addr::LOCALHOST.octets(), None),
        ];

        let mut eth = Interface::new("eth0");
        eth.index = Some(2);
        eth.flags = InterfaceFlags::UP | InterfaceFlags::BROADCAST | InterfaceFlags::MULTICAST;
        eth.hardware_address = Some(MacAddr([0x02, 0x42, 0xac, 0x11, 0x00, 0x02]));
        eth.addresses = vec![classify(
            AddressFamily::V4,
            &[172, 17, 0, 2],
            Some(&[255, 255, 0, 0][..]),
        )
        .with_broadcast(Some(&[172, 17, 255, 255][..]))];

        let mut down = Interface::new("dummy0");
        down.index = Some(3);

        vec![lo, eth, down]
    }

    struct Unavailable;

    impl Enumerate for Unavailable {
        fn name(&self) -> &'static str {
            "unavailable"
        }

        fn enumerate(&self) -> Result<Vec<Interface>> {
            Err(Error::enumeration("no query facility available"))
        }
    }

    #[test]
    fn test_status() {
        let interfaces = sample();
        assert_eq!(interfaces[0].status(), Status::Configured);
        assert_eq!(interfaces[1].status(), Status::Configured);
        assert_eq!(interfaces[2].status(), Status::NotConfigured);
        assert_eq!(Status::NotConfigured.to_string(), "!CONFIGURED");
    }

    #[test]
    fn test_failed_enumeration() {
        match Unavailable.enumerate() {
            Err(Error::Enumeration { reason }) => assert!(!reason.is_empty()),
            other => panic!("Expected an enumeration error, got {other:?}"),
        }
    }

    #[test]
    fn test_mac_addr() {
        assert_eq!(MacAddr::from_bytes(&[0; 6]), None);
        assert_eq!(MacAddr::from_bytes(&[1, 2, 3]), None);
        let mac = MacAddr::from_bytes(&[0x02, 0x42, 0xac, 0x11, 0x00, 0x02, 0xff]).unwrap();
        assert_eq!(mac.to_string(), "02:42:ac:11:00:02");
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("ioctl".parse::<Backend>(), Ok(Backend::Ioctl));
        assert_eq!("IFADDRS".parse::<Backend>(), Ok(Backend::Ifaddrs));
        assert!("netlink".parse::<Backend>().unwrap_err().contains("pcap"));
        for backend in Backend::ALL {
            assert_eq!(backend.to_string().parse::<Backend>(), Ok(backend));
        }
    }

    #[cfg(not(feature = "pcap"))]
    #[test]
    fn test_pcap_unsupported_without_feature() {
        assert!(matches!(
            Backend::Pcap.enumerator(),
            Err(Error::Unsupported("pcap"))
        ));
    }

    #[test]
    fn test_filter_criteria() {
        let loopback = InterfaceFilter::new().loopback().apply(sample());
        assert_eq!(loopback.len(), 1);
        assert_eq!(loopback[0].name, "lo");

        let by_name = InterfaceFilter::new().name("eth0").apply(sample());
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].index, Some(2));

        let by_index = InterfaceFilter::new().index(3).apply(sample());
        assert_eq!(by_index.len(), 1);
        assert_eq!(by_index[0].name, "dummy0");

        assert_eq!(InterfaceFilter::new().apply(sample()), sample());
    }

    #[test]
    fn test_filter_family() {
        let v6 = InterfaceFilter::new().v6().apply(sample());
        assert_eq!(v6.len(), 1);
        assert_eq!(v6[0].name, "lo");
        assert!(v6[0].addresses.iter().all(Address::is_ipv6));

        let v4 = InterfaceFilter::new().v4().apply(sample());
        let names: Vec<_> = v4.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["lo", "eth0"]);
        assert!(v4.iter().flat_map(|i| &i.addresses).all(Address::is_ipv4));

        let both = InterfaceFilter::new().v4().v6().apply(sample());
        assert_eq!(both[0].addresses.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_interfaces() {
        let interfaces = interfaces().unwrap();

        // Print interfaces for debugging
        for interface in &interfaces {
            eprintln!("{interface:#?}");
        }

        // Check for exactly one localhost interface
        let loopback: Vec<_> = interfaces.iter().filter(|i| i.is_loopback()).collect();
        assert_eq!(loopback.len(), 1, "Expected one loopback interface");
        assert!(
            loopback[0]
                .addresses
                .iter()
                .any(|a| *a == IpAddr::V4(Ipv4Addr::LOCALHOST)),
            "Loopback interface has no 127.0.0.1"
        );
        assert!(loopback[0].flag_names().contains(&FlagName::Loopback));

        // Names are unique
        for (i, interface) in interfaces.iter().enumerate() {
            assert!(
                interfaces[i + 1..].iter().all(|o| o.name != interface.name),
                "Duplicate interface {}",
                interface.name
            );
        }

        // Sanity check that any interface with an index matches its name
        for interface in &interfaces {
            if let Some(index) = interface.index {
                let name_from_index = if_indextoname(index).unwrap_or_default();
                assert_eq!(
                    interface.name, name_from_index,
                    "Interface name mismatch for index {index}"
                );
            }
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_filter_loopback_on_host() {
        let loopback_interfaces = InterfaceFilter::new()
            .loopback()
            .get(Backend::Ifaddrs)
            .unwrap();

        assert!(
            !loopback_interfaces.is_empty(),
            "No loopback interfaces found"
        );

        for interface in &loopback_interfaces {
            assert!(
                interface.flags.contains(InterfaceFlags::LOOPBACK),
                "Interface {:?} is not marked as loopback",
                interface.name
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_nametoindex_numeric() {
        assert_eq!(if_nametoindex("7").unwrap(), 7);
        assert!(if_nametoindex("definitely-not-an-interface").is_err());
    }
}
