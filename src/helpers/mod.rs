mod load_dotenv;
mod time;

pub use load_dotenv::load_dotenv;
pub use time::{format_hour_minute, parse_utc};

pub mod base_path;

use getrandom::getrandom;

pub fn rand_hex(bytes: usize) -> String {
    let mut rand = vec![0u8; bytes];
    if let Err(e) = getrandom(&mut rand) {
        // Only used for client ids; an all-zero suffix still works
        log::warn!("Could not obtain random bytes: {e}");
    }
    hex::encode(rand)
}
