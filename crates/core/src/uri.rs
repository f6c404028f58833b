//! Connection URI building
//!
//! Drivers that take a connection string get one in the form
//! `<scheme>://<user>:<password>@<host>/`, with both credentials
//! percent-encoded the way `encodeURIComponent` does it.

use crate::connect::{ConnectOptions, Credentials};

/// Characters left as-is besides ASCII alphanumerics
const UNRESERVED: &[u8] = b"-_.!~*'()";

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encode every byte except ASCII alphanumerics and `-_.!~*'()`
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        if byte.is_ascii_alphanumeric() || UNRESERVED.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX[(byte >> 4) as usize] as char);
            out.push(HEX[(byte & 0x0f) as usize] as char);
        }
    }
    out
}

/// Full connection string including credentials
///
/// The result contains the password. Never log it; use [`redacted_uri`].
pub fn connection_uri(options: &ConnectOptions, credentials: &Credentials) -> String {
    format!(
        "{}://{}:{}@{}/",
        options.scheme,
        encode_uri_component(&credentials.username),
        encode_uri_component(&credentials.password),
        options.host
    )
}

/// Connection string with the password masked, for logs
pub fn redacted_uri(options: &ConnectOptions, username: &str) -> String {
    format!(
        "{}://{}:****@{}/",
        options.scheme,
        encode_uri_component(username),
        options.host
    )
}
