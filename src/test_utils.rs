//! Shared proptest strategies for unit tests.

use proptest::prelude::*;

/// Well-formed addresses: `local@domain.tld`.
pub fn arb_email() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9._%+-]{1,12}@[a-z0-9-]{1,12}\\.[a-z]{2,6}")
        .expect("valid regex")
}

/// Empty or whitespace-only strings.
pub fn arb_blank() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ \\t\\n\\r]{0,6}").expect("valid regex")
}

/// Strings with at least one visible character.
pub fn arb_non_blank() -> impl Strategy<Value = String> {
    prop::string::string_regex(" {0,3}[A-Za-z0-9]{1,16} {0,3}").expect("valid regex")
}

/// MIME types from the stock allow-list.
pub fn arb_allowed_mime() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("image/jpeg"),
        Just("image/png"),
        Just("application/pdf"),
        Just("application/msword"),
        Just("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    ]
}

/// MIME types outside the stock allow-list.
pub fn arb_disallowed_mime() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("image/gif"),
        Just("image/svg+xml"),
        Just("text/html"),
        Just("application/x-msdownload"),
        Just(""),
    ]
}
