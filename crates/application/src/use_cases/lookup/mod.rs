pub mod lookup_hosts;

pub use lookup_hosts::LookupHostsUseCase;
