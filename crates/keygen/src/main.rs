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

use env_logger::Env;

use peer_keygen::{Cli, GeneratedKey, KeyType};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse_args();

    // Validate the type before anything is generated or written
    let key_type: KeyType = cli.key_type.parse()?;
    log::info!("Generating {key_type} key");
    let key = GeneratedKey::generate(key_type, cli.bitsize)?;
    let peer_id = key.peer_id();
    log::info!("Peer ID: {peer_id}");

    if let Err(e) = cli.output().emit(&peer_id, &key.to_base64()) {
        log::error!("{e}");
        return Err(e.into());
    }
    Ok(())
}
