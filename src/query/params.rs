//! Query string access.

/// Ordered query parameters of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a raw (undecoded) query string such as `offset=10&limit=5`.
    pub fn parse(raw: &str) -> Self {
        let pairs = url::form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();
        Self { pairs }
    }

    /// Parse an optional raw query string; `None` yields no parameters.
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.map(Self::parse).unwrap_or_default()
    }

    /// Value of `name` for a transform.
    ///
    /// The name is trimmed. Absent parameters yield `None`; repeated
    /// parameters yield the first occurrence.
    pub fn first(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}
