//! # Probe Arguments
//!
//! Command-line surface of `check_b2share` and its conversion into a typed
//! [`ProbeConfig`]. Flag names follow the Nagios plugin conventions used by
//! the existing B2SHARE probe deployments.

use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};

use b2probe_client::{parse_base_url, ClientConfig};
use b2probe_schema::{Sanitizer, TitleRule};

use crate::verdict::ProbeError;

/// Unified B2SHARE Nagios probe.
///
/// Searches the instance for public records, fetches one record with its
/// metadata schema and file bucket, validates the metadata, and checks that
/// the first file is reachable.
#[derive(Parser, Debug)]
#[command(name = "check_b2share", version, about, long_about = None)]
pub struct ProbeArgs {
    /// Base URL of the B2SHARE instance.
    #[arg(short, long)]
    pub url: String,

    /// Timeout for the whole probe in seconds.
    #[arg(
        short,
        long,
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Increase output verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Verify the TLS certificate (default).
    #[arg(long, overrides_with = "no_verify_tls_cert")]
    pub verify_tls_cert: bool,

    /// Disable TLS certificate verification (NOT recommended).
    #[arg(long, overrides_with = "verify_tls_cert")]
    pub no_verify_tls_cert: bool,

    /// Return CRITICAL if no public records are present.
    #[arg(long)]
    pub error_if_no_records_present: bool,

    /// Allow requests to use proxies from the environment.
    #[arg(long)]
    pub use_proxy: bool,

    /// Validate RDM metadata as served, without stripping vocabulary fields.
    #[arg(long)]
    pub strict_metadata: bool,

    /// Log every stripped (or, in strict mode, flagged) vocabulary field.
    #[arg(long)]
    pub debug_vocab: bool,

    /// Print a sorted summary of vocabulary-like fields.
    #[arg(long)]
    pub vocab_report: bool,

    /// When a `title` next to an `id` counts as vocabulary enrichment.
    #[arg(long, value_enum, default_value_t = TitleRuleArg::WhenIdPresent)]
    pub title_rule: TitleRuleArg,
}

/// Command-line spelling of [`TitleRule`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleRuleArg {
    /// Drop `title` whenever the object has an `id`.
    WhenIdPresent,
    /// Keep `title` on objects that carry `description` or `link`.
    UnlessDescribed,
}

impl From<TitleRuleArg> for TitleRule {
    fn from(arg: TitleRuleArg) -> Self {
        match arg {
            TitleRuleArg::WhenIdPresent => TitleRule::WhenIdPresent,
            TitleRuleArg::UnlessDescribed => TitleRule::UnlessDescribed,
        }
    }
}

/// Verbosity levels of the Nagios plugin guidelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Single-line summary only.
    None = 0,
    /// Additional information.
    Single = 1,
    /// Configuration and step-by-step progress.
    Multi = 2,
    /// Request-level trace.
    Debug = 3,
}

impl Verbosity {
    /// Map a `-v` count, clamping anything above 3.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Self::None,
            1 => Self::Single,
            2 => Self::Multi,
            _ => Self::Debug,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    /// `tracing` filter directive for this verbosity.
    pub fn filter_directive(self, debug_vocab: bool) -> String {
        let base = match self {
            Self::None => "error",
            Self::Single => "warn",
            Self::Multi => "info",
            Self::Debug => "debug",
        };
        if debug_vocab && self < Self::Debug {
            format!("{base},b2probe_schema::sanitize=debug")
        } else {
            base.to_string()
        }
    }
}

/// How RDM metadata is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Strip vocabulary fields first; failures are warnings.
    #[default]
    Lenient,
    /// Validate as served; failures are critical.
    Strict,
}

/// Metadata validation knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataOptions {
    pub mode: ValidationMode,
    pub report: bool,
    pub debug_vocab: bool,
    pub title_rule: TitleRule,
}

impl MetadataOptions {
    pub fn sanitizer(&self) -> Sanitizer {
        Sanitizer::new(self.title_rule).with_trace(self.debug_vocab)
    }
}

/// Validated probe configuration.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub client: ClientConfig,
    pub timeout: Duration,
    pub verbosity: Verbosity,
    pub error_if_no_records: bool,
    pub metadata: MetadataOptions,
}

impl ProbeConfig {
    /// Check the arguments and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidUrl`] if the base URL is malformed.
    pub fn from_args(args: &ProbeArgs) -> Result<Self, ProbeError> {
        let base_url = parse_base_url(&args.url).map_err(|e| {
            tracing::debug!("{e}");
            ProbeError::InvalidUrl(args.url.clone())
        })?;

        let mut client = ClientConfig::new(base_url);
        client.verify_tls = !args.no_verify_tls_cert;
        client.use_proxy = args.use_proxy;

        Ok(Self {
            client,
            timeout: Duration::from_secs(args.timeout),
            verbosity: Verbosity::from_count(args.verbose),
            error_if_no_records: args.error_if_no_records_present,
            metadata: MetadataOptions {
                mode: if args.strict_metadata {
                    ValidationMode::Strict
                } else {
                    ValidationMode::Lenient
                },
                report: args.vocab_report,
                debug_vocab: args.debug_vocab,
                title_rule: args.title_rule.into(),
            },
        })
    }
}
