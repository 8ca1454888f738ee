//! Reflector DNS Infrastructure Layer
pub mod dns;
pub mod lookup;
pub mod persistent;
