//! Wordclash Dictionary: checks candidate words against a public
//! dictionary service.

pub mod http_validator;
