/// Length of the leading run of bytes matching `$pattern`, starting at
/// `$offset`. The pattern is a `matches!` byte pattern, so ranges and
/// alternations compile to plain comparisons.
macro_rules! strspn {
    ($bytes:expr, $pattern:pat $(if $guard:expr)?, $offset:expr) => {{
        let haystack = &$bytes[$offset.min($bytes.len())..];
        haystack
            .iter()
            .position(|&b| !matches!(b, $pattern $(if $guard)?))
            .unwrap_or(haystack.len())
    }};
}

/// Length of the leading run of bytes NOT matching `$pattern`, starting at
/// `$offset`.
macro_rules! strcspn {
    ($bytes:expr, $pattern:pat $(if $guard:expr)?, $offset:expr) => {{
        let haystack = &$bytes[$offset.min($bytes.len())..];
        haystack
            .iter()
            .position(|&b| matches!(b, $pattern $(if $guard)?))
            .unwrap_or(haystack.len())
    }};
}

#[cfg(test)]
mod test {
    #[test]
    fn strspn() {
        assert_eq!(strspn!(b"  \tdiv", b' ' | b'\t', 0), 3);
        assert_eq!(strspn!(b"  \tdiv", b' ' | b'\t', 2), 1);
        assert_eq!(strspn!(b"div", b' ' | b'\t', 0), 0);
        assert_eq!(strspn!(b"   ", b' ', 0), 3);
        assert_eq!(strspn!(b"   ", b' ', 5), 0);
    }

    #[test]
    fn strcspn() {
        assert_eq!(strcspn!(b"class=foo", b'=' | b' ', 0), 5);
        assert_eq!(strcspn!(b"class=foo", b'=' | b' ', 6), 3);
        assert_eq!(strcspn!(b">", b'>', 0), 0);
        assert_eq!(strcspn!(b"abc", b'~', 1), 2);
    }
}
