//! `document.cookie` parsing

/// Value of the cookie `name` in a `document.cookie` style string
/// (`a=1; b=2`), percent-decoded.
///
/// A value that is not valid percent-encoding is returned as is.
pub fn read_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(|raw| {
            urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |v| v.into_owned())
        })
}
