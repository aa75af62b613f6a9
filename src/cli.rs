use clap::Parser;

#[derive(Parser, Default)]
#[command(name = "ifwatch", about = "A live per-interface network traffic monitor")]
#[command(version, long_about = None)]
pub struct Args {
    /// List active network interfaces and exit
    #[arg(short, long)]
    pub list: bool,

    /// Open the interface picker, print the chosen name and exit
    #[arg(short = 's', long = "select")]
    pub select: bool,

    /// Activity unit (k = kbits/s, K = kbytes/s)
    #[arg(short = 'u', long = "unit", default_value = "k")]
    pub unit: RateUnit,

    /// Put all interfaces into promiscuous mode while monitoring
    #[arg(short = 'p', long = "promisc")]
    pub promisc: bool,

    /// Write periodic counter snapshots to the default log file
    #[arg(short = 'L', long = "log")]
    pub log: bool,

    /// Snapshot log file path (implies --log)
    #[arg(short = 'f', long = "logfile")]
    pub logfile: Option<String>,

    /// Seconds between log snapshots
    #[arg(long = "log-interval", default_value = "3600")]
    pub log_interval: u64,

    /// Screen update interval in seconds (0 = rapid default cadence)
    #[arg(short = 't', long = "interval", default_value = "0")]
    pub update_interval: u64,

    /// Stop monitoring after this many minutes (0 = run until quit)
    #[arg(short = 'T', long = "timeout", default_value = "0")]
    pub timeout_minutes: u64,

    /// Directory for facility and instance state files
    #[arg(long = "state-dir")]
    pub state_dir: Option<String>,
}

impl Args {
    /// Logging is on when either the flag or an explicit file was given.
    #[must_use]
    pub fn logging_requested(&self) -> bool {
        self.log || self.logfile.is_some()
    }
}

/// Unit used for the activity column and for logged rates.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RateUnit {
    #[value(name = "k")]
    #[default]
    Kilobits, // kbits/s
    #[value(name = "K")]
    Kilobytes, // kbytes/s
}

impl RateUnit {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Kilobits => "kbits/s",
            Self::Kilobytes => "kbytes/s",
        }
    }

    #[must_use]
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Kilobits => "k",
            Self::Kilobytes => "K",
        }
    }

    #[must_use]
    pub fn from_key(s: &str) -> Option<Self> {
        match s {
            "k" => Some(Self::Kilobits),
            "K" => Some(Self::Kilobytes),
            _ => None,
        }
    }
}
