//! Request parameter dictionary.
//!
//! [`Params`] holds decoded request parameters (from the query string or an
//! urlencoded form body) in submission order, mirroring Spring MVC's request
//! parameter map.

/// An ordered, read-only dictionary of request parameters.
///
/// Repeated keys are kept in submission order. [`get`](Params::get) returns
/// the first value for a key, matching `HttpServletRequest#getParameter`;
/// [`get_all`](Params::get_all) returns every value.
///
/// # Examples
///
/// ```
/// use sprung_http::Params;
///
/// let params = Params::parse("color=red&color=blue&size=large");
/// assert_eq!(params.get("color"), Some("red"));
/// assert_eq!(params.get_all("color"), vec!["red", "blue"]);
/// assert_eq!(params.get("size"), Some("large"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Creates a new, empty `Params`.
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Parses a URL query string (e.g. `"key1=val1&key2=val2"`).
    ///
    /// Handles percent-encoding, decodes `+` as a space, and keeps repeated
    /// keys in order. A pair without `=` maps to the empty string.
    pub fn parse(query_string: &str) -> Self {
        let mut pairs = Vec::new();

        for pair in query_string.split('&') {
            if pair.is_empty() {
                continue;
            }

            let (key, value) = pair
                .find('=')
                .map_or((pair, ""), |eq_pos| (&pair[..eq_pos], &pair[eq_pos + 1..]));

            pairs.push((percent_decode(key), percent_decode(value)));
        }

        Self { pairs }
    }

    /// Creates a `Params` from already-decoded pairs, preserving their order.
    ///
    /// Multipart form fields arrive decoded, so they enter through here.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Returns the first value for the given key, or `None` if not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns all values for the given key, in submission order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns `true` if the specified key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Returns an iterator over the distinct keys, in first-appearance order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().enumerate().filter_map(|(i, (k, _))| {
            if self.pairs[..i].iter().any(|(prev, _)| prev == k) {
                None
            } else {
                Some(k.as_str())
            }
        })
    }

    /// Returns an iterator over all `(key, value)` pairs in submission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of `(key, value)` pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no pairs are present.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encodes the pairs as a URL query string, preserving order.
    pub fn urlencode(&self) -> String {
        let parts: Vec<String> = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect();
        parts.join("&")
    }
}

/// Decodes a percent-encoded string.
fn percent_decode(input: &str) -> String {
    // Replace + with space (form encoding), then decode percent sequences
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Percent-encodes a string for use in a URL query.
fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}
