mod macros;

/// Version of the contact backend, as reported by the CLI and the http client.
pub const fn innube_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns `Some(value)` unless `value` is empty.
///
/// Mirrors how the contact form treats blank inputs: an empty string is the
/// same as a missing one.
///
/// #### Example
/// ```rust
/// # use innube_utils::non_empty;
/// assert_eq!(non_empty(String::new()), None);
/// assert_eq!(non_empty("Ana".to_owned()), Some("Ana".to_owned()));
/// ```
pub fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
