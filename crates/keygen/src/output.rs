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

use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use libp2p::PeerId;

use crate::KeygenError;

/// Where the generated peer ID and private key end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Two lines on stdout: the peer ID, then the base64 private key.
    Stdout,
    /// One file each, without trailing newlines.
    Files {
        peer_id_path: PathBuf,
        private_key_path: PathBuf,
    },
}

impl Output {
    pub fn emit(&self, peer_id: &PeerId, private_key: &str) -> Result<(), KeygenError> {
        match self {
            Self::Stdout => write_lines(&mut std::io::stdout().lock(), peer_id, private_key)
                .map_err(|error| KeygenError::Io {
                    what: "output",
                    path: PathBuf::from("<stdout>"),
                    error,
                }),
            Self::Files {
                peer_id_path,
                private_key_path,
            } => write_files(peer_id_path, private_key_path, peer_id, private_key),
        }
    }
}

pub fn write_lines<W: Write>(
    writer: &mut W,
    peer_id: &PeerId,
    private_key: &str,
) -> std::io::Result<()> {
    writeln!(writer, "{peer_id}")?;
    writeln!(writer, "{private_key}")?;
    writer.flush()
}

pub fn write_files(
    peer_id_path: &Path,
    private_key_path: &Path,
    peer_id: &PeerId,
    private_key: &str,
) -> Result<(), KeygenError> {
    File::create(peer_id_path)
        .and_then(|mut f| f.write_all(peer_id.to_string().as_bytes()))
        .map_err(io_error("peer id", peer_id_path))?;
    log::info!("Peer ID written to {}", peer_id_path.display());

    create_private(private_key_path)
        .and_then(|mut f| f.write_all(private_key.as_bytes()))
        .map_err(io_error("private key", private_key_path))?;
    log::info!("Private key written to {}", private_key_path.display());
    Ok(())
}

fn io_error(what: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> KeygenError {
    let path = path.to_path_buf();
    move |error| KeygenError::Io { what, path, error }
}

#[cfg(unix)]
fn create_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
