pub mod defaults;
pub mod envvars;
pub mod keys;
pub mod topics;

mod remote_defaults;

pub use remote_defaults::REMOTE_DEFAULTS;
