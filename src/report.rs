//! Human-readable and JSON rendering of enumerated interfaces.

use std::io::Write;

use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::{Address, FlagName, Interface, Result, Status};

/// The output format of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportStyle {
    /// Numbered, line-oriented text.
    #[default]
    Text,
    /// A pretty-printed JSON array.
    Json,
}

/// The banner line heading a text report.
pub fn banner(backend: &str) -> String {
    format!(
        "LSDEV - {} {} ({backend})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

/// Writes interface reports to an output stream.
///
/// Any write error aborts the report and is returned as [`crate::Error::Io`].
pub struct Reporter<W: Write> {
    out: W,
    backend: String,
    color: bool,
}

impl<W: Write> Reporter<W> {
    /// Creates an uncolored reporter naming `backend` in its banner.
    pub fn new(out: W, backend: impl Into<String>) -> Self {
        Reporter {
            out,
            backend: backend.into(),
            color: false,
        }
    }

    /// Enables ANSI colors. `colored` still drops them when stdout is not a
    /// terminal or `NO_COLOR` is set.
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Writes a full report in the given style.
    pub fn write(&mut self, style: ReportStyle, interfaces: &[Interface]) -> Result<()> {
        match style {
            ReportStyle::Text => self.write_text(interfaces),
            ReportStyle::Json => self.write_json(interfaces),
        }
    }

    /// Writes the banner and every interface, numbered from 1.
    pub fn write_text(&mut self, interfaces: &[Interface]) -> Result<()> {
        self.write_header()?;
        for (i, interface) in interfaces.iter().enumerate() {
            self.write_interface(i + 1, interface)?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Writes the banner, an underline of the same width, and a blank line.
    pub fn write_header(&mut self) -> Result<()> {
        let banner = banner(&self.backend);
        writeln!(self.out, "{banner}")?;
        writeln!(self.out, "{}", "=".repeat(banner.chars().count()))?;
        writeln!(self.out)?;
        Ok(())
    }

    /// Writes the block for one interface.
    pub fn write_interface(&mut self, number: usize, interface: &Interface) -> Result<()> {
        let status = interface.status();
        let status_text = status.to_string();
        let status_text = match status {
            Status::Configured => self.paint(&status_text, |s| s.green()),
            Status::NotConfigured => self.paint(&status_text, |s| s.red()),
        };
        let number = self.paint(&number.to_string(), |s| s.underline());
        let name = self.paint(&interface.name, |s| s.bright_black().bold());
        writeln!(self.out, "#{number}.) Name: {name} | Status: {status_text}")?;

        for address in &interface.addresses {
            self.write_address(address)?;
        }

        if let Some(mac) = interface.hardware_address {
            writeln!(self.out, "\tether {mac}")?;
        }
        if let Some(index) = interface.index {
            writeln!(self.out, "\tindex {index}")?;
        }

        let names: Vec<_> = interface
            .flag_names()
            .iter()
            .map(|name| name.as_str())
            .collect();
        writeln!(
            self.out,
            "\tflags={:#x} <{}>",
            interface.flags.bits(),
            names.join(",")
        )?;
        writeln!(self.out)?;
        Ok(())
    }

    fn write_address(&mut self, address: &Address) -> Result<()> {
        let family = address.family();
        let text = self.paint(&address.to_string(), |s| s.bright_green().bold());
        writeln!(self.out, "\t{family} Address => {text}")?;
        if let Some(netmask) = address.netmask() {
            writeln!(self.out, "\t\t# NETMASK >> {netmask}")?;
        }
        if let Some(broadcast) = address.broadcast() {
            writeln!(self.out, "\t\t# BROADCAST >> {broadcast}")?;
        }
        if let Some(destination) = address.destination() {
            writeln!(self.out, "\t\t# DESTINATION >> {destination}")?;
        }
        Ok(())
    }

    /// Writes every interface as a pretty-printed JSON array.
    pub fn write_json(&mut self, interfaces: &[Interface]) -> Result<()> {
        let views: Vec<_> = interfaces
            .iter()
            .enumerate()
            .map(|(i, interface)| InterfaceView::new(i + 1, interface))
            .collect();
        serde_json::to_writer_pretty(&mut self.out, &views)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_owned()
        }
    }
}

#[derive(Serialize)]
struct InterfaceView<'a> {
    number: usize,
    name: &'a str,
    index: Option<u32>,
    status: Status,
    flags: Vec<FlagName>,
    hardware_address: Option<String>,
    addresses: Vec<AddressView>,
}

impl<'a> InterfaceView<'a> {
    fn new(number: usize, interface: &'a Interface) -> Self {
        InterfaceView {
            number,
            name: &interface.name,
            index: interface.index,
            status: interface.status(),
            flags: interface.flag_names(),
            hardware_address: interface.hardware_address.map(|mac| mac.to_string()),
            addresses: interface.addresses.iter().map(AddressView::from).collect(),
        }
    }
}

#[derive(Serialize)]
struct AddressView {
    family: &'static str,
    address: String,
    netmask: Option<String>,
    broadcast: Option<String>,
    destination: Option<String>,
}

impl From<&Address> for AddressView {
    fn from(address: &Address) -> Self {
        AddressView {
            family: address.family().as_str(),
            address: address.to_string(),
            netmask: address.netmask().map(|ip| ip.to_string()),
            broadcast: address.broadcast().map(|ip| ip.to_string()),
            destination: address.destination().map(|ip| ip.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify, AddressFamily, Error, InterfaceFlags, MacAddr};
    use std::io;

    fn eth0() -> Interface {
        let mut eth = Interface::new("eth0");
        eth.index = Some(2);
        eth.flags = InterfaceFlags::UP
            | InterfaceFlags::BROADCAST
            | InterfaceFlags::RUNNING
            | InterfaceFlags::MULTICAST;
        eth.hardware_address = Some(MacAddr([0x02, 0x42, 0xac, 0x11, 0x00, 0x02]));
        eth.addresses = vec![
            classify(AddressFamily::V4, &[172, 17, 0, 2], Some(&[255, 255, 0, 0][..]))
                .with_broadcast(Some(&[172, 17, 255, 255][..])),
            classify(AddressFamily::Other(17), &[], None),
        ];
        eth
    }

    fn render(interfaces: &[Interface]) -> String {
        let mut reporter = Reporter::new(Vec::new(), "test");
        reporter.write_text(interfaces).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_header_underline() {
        let text = render(&[]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("LSDEV - lsdev "));
        assert!(lines[0].ends_with("(test)"));
        assert_eq!(lines[1].len(), lines[0].len());
        assert!(lines[1].chars().all(|c| c == '='));
        assert_eq!(lines[2], "");
    }

    #[test]
    fn test_interface_block() {
        let text = render(&[eth0(), Interface::new("dummy0")]);
        let body: Vec<_> = text.lines().skip(3).collect();
        assert_eq!(
            body,
            [
                "#1.) Name: eth0 | Status: CONFIGURED",
                "\tIPv4 Address => 172.17.0.2",
                "\t\t# NETMASK >> 255.255.0.0",
                "\t\t# BROADCAST >> 172.17.255.255",
                "\t???? Address => <unknown family 17>",
                "\tether 02:42:ac:11:00:02",
                "\tindex 2",
                "\tflags=0x1043 <UP,BROADCAST,RUNNING,MULTICAST>",
                "",
                "#2.) Name: dummy0 | Status: !CONFIGURED",
                "\tflags=0x0 <>",
                "",
            ]
        );
    }

    #[test]
    fn test_json() {
        let mut reporter = Reporter::new(Vec::new(), "test");
        reporter.write(ReportStyle::Json, &[eth0()]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();

        let eth = &value[0];
        assert_eq!(eth["number"], 1);
        assert_eq!(eth["name"], "eth0");
        assert_eq!(eth["status"], "configured");
        assert_eq!(
            eth["flags"],
            serde_json::json!(["UP", "BROADCAST", "RUNNING", "MULTICAST"])
        );
        assert_eq!(eth["hardware_address"], "02:42:ac:11:00:02");
        assert_eq!(eth["addresses"][0]["family"], "ipv4");
        assert_eq!(eth["addresses"][0]["netmask"], "255.255.0.0");
        assert_eq!(eth["addresses"][0]["broadcast"], "172.17.255.255");
        assert!(eth["addresses"][0]["destination"].is_null());
        assert_eq!(eth["addresses"][1]["family"], "other");
        assert!(eth["addresses"][1]["netmask"].is_null());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_output_error_aborts() {
        let mut reporter = Reporter::new(BrokenPipe, "test");
        match reporter.write_text(&[eth0()]) {
            Err(Error::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("Expected an I/O error, got {other:?}"),
        }
    }
}
