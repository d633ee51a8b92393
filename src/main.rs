mod argsets;
mod command;
mod constants;
mod glucose;
mod helpers;
mod interfaces;
mod relay;
mod settings;

use anyhow::{anyhow, Result};
use env_logger::Env;

use crate::constants::{defaults, envvars};

const CMD_RELAY: &str = "relay";
const CMD_FETCH: &str = "fetch";
const CMD_KVS_GET: &str = "kvs-get";
const CMD_KVS_SET: &str = "kvs-set";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    helpers::load_dotenv();
    env_logger::Builder::from_env(
        Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL),
    )
    .init();

    let mut args = pico_args::Arguments::from_env();
    match args.subcommand()?.as_deref() {
        Some(CMD_RELAY) => command::relay().await,
        Some(CMD_FETCH) => command::fetch().await,
        Some(CMD_KVS_GET) => command::kvs_get(argsets::KvsGetArgs {
            key: args.free_from_str()?,
        }),
        Some(CMD_KVS_SET) => command::kvs_set(argsets::KvsSetArgs {
            key: args.free_from_str()?,
            value: args.free_from_str()?,
        }),
        _ => Err(anyhow!(
            "Subcommand must be one of 'relay', 'fetch', 'kvs-get', 'kvs-set'"
        )),
    }
}
