mod dns;
mod signal;

pub use dns::run_server;
