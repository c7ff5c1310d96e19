//! Command-line surface: argv → [`ProxyConfig`].

use clap::Parser;

use crate::config::{
    validate_port, DisplayMode, ProxyConfig, SubstitutionRule, MAX_REPLACE_OPERAND,
    MAX_REPLACE_RULES,
};
use crate::error::ConfigError;

/// TCP port-forwarding and observation proxy.
#[derive(Parser, Debug)]
#[command(name = "relay-core", about = "TCP relay with substitution and transcript display", long_about = None)]
pub struct RawArgs {
    /// Local port to listen on
    pub src_port: i64,

    /// Upstream host name or address
    pub server: String,

    /// Upstream port to connect to
    pub dst_port: i64,

    /// Raw transcript: payload bytes inserted verbatim
    #[arg(short = 'w', long = "raw")]
    pub raw: bool,

    /// Strip transcript: non-printable bytes replaced with '.'
    #[arg(short = 's', long = "strip")]
    pub strip: bool,

    /// Hex-dump transcript
    #[arg(short = 'h', long = "hex")]
    pub hex: bool,

    /// Auto-escaped transcript, chunked every N input bytes
    #[arg(short = 'a', long = "auto", value_name = "N")]
    pub auto: Option<i64>,

    /// Append a substitution rule: PATTERN REPLACEMENT. May appear up to 50 times.
    #[arg(
        short = 'r',
        long = "replace",
        num_args = 2,
        value_names = ["PATTERN", "REPLACEMENT"],
        action = clap::ArgAction::Append
    )]
    pub replace: Vec<String>,
}

impl RawArgs {
    /// Validate and convert parsed CLI arguments into an immutable
    /// [`ProxyConfig`], or the first [`ConfigError`] encountered.
    pub fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let src_port = validate_port(self.src_port)?;
        let dst_port = validate_port(self.dst_port)?;

        let selected = self.raw as u8 + self.strip as u8 + self.hex as u8 + self.auto.is_some() as u8;
        if selected > 1 {
            return Err(ConfigError::ConflictingDisplayModes);
        }

        let display_mode = if self.raw {
            DisplayMode::Raw
        } else if self.strip {
            DisplayMode::Strip
        } else if self.hex {
            DisplayMode::Hex
        } else if let Some(n) = self.auto {
            if n < 1 {
                return Err(ConfigError::InvalidAutoWidth(n));
            }
            DisplayMode::Auto(n as u32)
        } else {
            DisplayMode::None
        };

        // `--replace` is collected as a flat Vec<String> of [pattern, replacement, ...] pairs.
        if self.replace.len() % 2 != 0 {
            return Err(ConfigError::MissingReplaceOperand);
        }
        let rule_count = self.replace.len() / 2;
        if rule_count > MAX_REPLACE_RULES {
            return Err(ConfigError::TooManyReplaceRules {
                count: rule_count,
                max: MAX_REPLACE_RULES,
            });
        }

        let mut rules = Vec::with_capacity(rule_count);
        for pair in self.replace.chunks_exact(2) {
            let pattern = pair[0].as_bytes().to_vec();
            let replacement = pair[1].as_bytes().to_vec();
            for operand in [&pattern, &replacement] {
                if operand.len() > MAX_REPLACE_OPERAND {
                    return Err(ConfigError::ReplaceOperandTooLong {
                        len: operand.len(),
                        max: MAX_REPLACE_OPERAND,
                    });
                }
            }
            rules.push(SubstitutionRule { pattern, replacement });
        }

        Ok(ProxyConfig {
            src_port,
            server: self.server,
            dst_port,
            display_mode,
            rules,
        })
    }
}
