/// A concrete lookup key accepted by the Open Library books endpoint.
///
/// No format validation is performed on the inner value beyond it being the
/// string the caller supplied. A malformed identifier is simply not found by
/// the remote service rather than rejected up front.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LookupKey {
    /// An ISBN-10 or ISBN-13 value.
    Isbn(String),
    /// An Open Library work identifier, e.g. `OL12345W`.
    Olid(String),
}

impl LookupKey {
    /// The composite bib-key string used by the books endpoint, both as a
    /// request parameter and as the key of the response envelope.
    #[must_use]
    pub fn bib_key(&self) -> String {
        match self {
            Self::Isbn(value) => format!("ISBN:{value}"),
            Self::Olid(value) => format!("OLID:{value}"),
        }
    }
}
