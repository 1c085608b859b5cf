#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Parse capture group `$idx` as a `u64`, returning `None` from the enclosing
/// function when the group is absent or does not fit.
#[macro_export]
macro_rules! capture_u64 {
    ($caps:expr, $idx:expr) => {
        $caps.get($idx)?.as_str().parse::<u64>().ok()?
    };
}

#[macro_export]
macro_rules! line_pattern {
    (name: $name:expr, extract: $extract:expr $(,)?) => {
        $crate::engine::LinePattern { name: $name, extract: $extract }
    };
}
