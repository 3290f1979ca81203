use std::io;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, LevelFilter};

use lsdev::{Backend, InterfaceFilter, ReportStyle, Reporter};

/// List network interfaces with their addresses, hardware address and flags
#[derive(Parser, Debug)]
#[command(name = "lsdev", version, about, long_about = None)]
struct Cli {
    /// Interface enumeration backend (ifaddrs, ioctl, pcap)
    #[arg(short, long, default_value_t = Backend::default())]
    backend: Backend,

    /// Only show the interface with this name
    #[arg(short, long, value_name = "NAME")]
    interface: Option<String>,

    /// Only show loopback interfaces
    #[arg(long, conflicts_with = "interface")]
    loopback: bool,

    /// Only show IPv4 addresses
    #[arg(short = '4', long = "inet")]
    v4: bool,

    /// Only show IPv6 addresses
    #[arg(short = '6', long = "inet6")]
    v6: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Disable color output
    #[arg(long)]
    no_color: bool,

    /// Verbose logging (-v, -vv, -vvv for increasing verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn filter(&self) -> InterfaceFilter {
        let mut filter = InterfaceFilter::new();
        if let Some(name) = &self.interface {
            filter = filter.name(name);
        }
        if self.loopback {
            filter = filter.loopback();
        }
        if self.v4 {
            filter = filter.v4();
        }
        if self.v6 {
            filter = filter.v6();
        }
        filter
    }

    fn style(&self) -> ReportStyle {
        if self.json {
            ReportStyle::Json
        } else {
            ReportStyle::Text
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> lsdev::Result<()> {
    let enumerator = cli.backend.enumerator()?;
    debug!("enumerating with {}", enumerator.name());
    let interfaces = cli.filter().apply(enumerator.enumerate()?);

    let stdout = io::stdout();
    let mut reporter = Reporter::new(stdout.lock(), enumerator.name()).color(!cli.no_color);
    reporter.write(cli.style(), &interfaces)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lsdev: {err}");
            ExitCode::FAILURE
        }
    }
}
