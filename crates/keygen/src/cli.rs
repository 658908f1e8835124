// peer-keygen, libp2p identity generator for the SQD Network.
// Copyright (C) 2024 Subsquid Labs GmbH

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::{ffi::OsString, path::PathBuf};

use clap::Parser;

use crate::{keys::DEFAULT_RSA_BITS, output::Output};

/// Long options that may also be spelled with a single dash (`-bitsize 4096`).
const LONG_FLAGS: [&str; 6] = ["bitsize", "type", "prvout", "pidout", "help", "version"];
const VALUE_FLAGS: [&str; 4] = ["bitsize", "type", "prvout", "pidout"];

#[derive(Parser, Debug)]
#[command(version, author, about = "Generate a libp2p key pair and its peer ID")]
pub struct Cli {
    #[arg(
        long,
        env = "KEY_BITSIZE",
        default_value_t = DEFAULT_RSA_BITS,
        allow_negative_numbers = true,
        help = "Bit size of the key to generate (RSA only)"
    )]
    pub bitsize: i64,

    #[arg(
        long = "type",
        env = "KEY_TYPE",
        default_value = "RSA",
        help = "Type of key to generate (RSA or Ed25519, case-insensitive)"
    )]
    pub key_type: String,

    #[arg(
        short = 'f',
        env = "KEY_TO_FILES",
        help = "Write the peer ID and private key to files instead of stdout"
    )]
    pub to_files: bool,

    #[arg(
        long,
        env = "PRIVATE_KEY_PATH",
        default_value = "priv.key",
        help = "Output file for the private key"
    )]
    pub prvout: PathBuf,

    #[arg(
        long,
        env = "PEER_ID_PATH",
        default_value = "peer.id",
        help = "Output file for the peer ID"
    )]
    pub pidout: PathBuf,
}

impl Cli {
    /// Parses process arguments, accepting single-dash long flags.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn output(&self) -> Output {
        if self.to_files {
            Output::Files {
                peer_id_path: self.pidout.clone(),
                private_key_path: self.prvout.clone(),
            }
        } else {
            Output::Stdout
        }
    }
}

/// Rewrites `-bitsize 4096` style arguments into `--bitsize=4096`.
///
/// A value-taking flag always consumes the next argument, even one starting
/// with a dash, so `-pidout -bitsize` stores `-bitsize` as the peer ID path.
/// The program name and everything after a bare `--` are left untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut result: Vec<OsString> = args.next().into_iter().collect();
    while let Some(arg) = args.next() {
        let Some((name, inline_value)) = arg.to_str().and_then(long_flag) else {
            let passthrough = arg == "--";
            result.push(arg);
            if passthrough {
                result.extend(args);
                break;
            }
            continue;
        };
        let mut normalized = OsString::from(format!("--{name}"));
        match inline_value {
            Some(value) => normalized.push(format!("={value}")),
            None if VALUE_FLAGS.contains(&name) => {
                if let Some(value) = args.next() {
                    normalized.push("=");
                    normalized.push(value);
                }
            }
            None => {}
        }
        result.push(normalized);
    }
    result
}

/// Splits `-name[=value]` or `--name[=value]` for a known long flag.
fn long_flag(arg: &str) -> Option<(&str, Option<&str>)> {
    let rest = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'))?;
    if rest.starts_with('-') {
        return None;
    }
    let (name, value) = match rest.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (rest, None),
    };
    LONG_FLAGS.contains(&name).then_some((name, value))
}
