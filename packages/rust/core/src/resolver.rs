//! Resolve the `doc` request parameter to a registered key.

use docviewer_shared::{DocKey, DocumentRegistry};

/// Raw value of the `doc` parameter as it arrived on the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocParam {
    /// A single value (`?doc=env`).
    One(String),
    /// Repeated values (`?doc=env&doc=awsS3`); only the first one counts.
    Many(Vec<String>),
}

impl DocParam {
    /// Collect the values of a possibly repeated parameter.
    ///
    /// Returns `None` when the parameter is absent.
    pub fn from_values<I, S>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = values.into_iter().map(Into::into).collect();
        match values.len() {
            0 => None,
            1 => values.pop().map(Self::One),
            _ => Some(Self::Many(values)),
        }
    }

    /// The value that selects the document.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(value) => Some(value),
            Self::Many(values) => values.first().map(String::as_str),
        }
    }
}

impl From<&str> for DocParam {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

/// Pick the document key for a request. Never fails: anything absent or
/// unrecognized resolves to the registry's default key.
pub fn resolve_key<'r>(registry: &'r DocumentRegistry, param: Option<&DocParam>) -> &'r DocKey {
    param
        .and_then(DocParam::first)
        .and_then(|key| registry.key(key))
        .unwrap_or_else(|| registry.default_key())
}
