//! Command-line arguments for `easysnmp`.

use clap::{Parser, ValueEnum};

use crate::error::Result;
use crate::result::SnmpResult;

/// Which operation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    Get,
    #[value(name = "getnext", alias = "get-next")]
    GetNext,
    #[value(name = "bulkget", alias = "get-bulk")]
    GetBulk,
    Walk,
    #[value(name = "bulkwalk", alias = "bulk-walk")]
    BulkWalk,
    Set,
}

impl Operation {
    /// Run against the process-wide runtime.
    pub fn run(self, tokens: &[String]) -> Result<Vec<SnmpResult>> {
        match self {
            Self::Get => crate::get(tokens),
            Self::GetNext => crate::get_next(tokens),
            Self::GetBulk => crate::get_bulk(tokens),
            Self::Walk => crate::walk(tokens),
            Self::BulkWalk => crate::bulk_walk(tokens),
            Self::Set => crate::set(tokens),
        }
    }
}

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `OID.index = TYPE: value` lines.
    #[default]
    Human,
    /// JSON array of results.
    Json,
    /// Tab-separated oid, index, type and value.
    Raw,
}

/// Run one SNMP operation and print the structured results.
///
/// Everything after the operation is passed through unchanged as the
/// operation's token list, e.g.
/// `easysnmp walk -v 2c -c public localhost system`.
#[derive(Debug, Parser)]
#[command(name = "easysnmp", version, about)]
pub struct Args {
    /// Output format.
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Show how long the operation took.
    #[arg(long = "timing")]
    pub timing: bool,

    /// Enable debug logging.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace-level logging (very verbose).
    #[arg(long = "trace")]
    pub trace: bool,

    /// Operation to run.
    #[arg(value_enum)]
    pub operation: Operation,

    /// Session and operation tokens: options, host, then operands.
    #[arg(
        value_name = "TOKENS",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub tokens: Vec<String>,
}

impl Args {
    /// Initialize tracing based on debug flags.
    ///
    /// Logs go to stderr so result output stays clean.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "easy_snmp=trace"
        } else if self.debug {
            "easy_snmp=debug"
        } else {
            "easy_snmp=warn"
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .try_init();
    }
}
