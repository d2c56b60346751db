use std::collections::HashMap;

use log::{info, trace};
use serde::Deserialize;
use serde_json::Value;

use crate::{key::LookupKey, Error, ErrorKind};

use super::Client;

const BOOKS_URL: &str = "https://openlibrary.org/api/books";
const SUBJECTS_URL: &str = "https://openlibrary.org/subjects";

pub(crate) fn first_work_in_subject<C: Client>(
    subject: &str,
    limit: usize,
) -> Result<LookupKey, Error> {
    info!("Searching the '{subject}' subject listing for a work");
    let url = format!("{SUBJECTS_URL}/{subject}.json?limit={limit}");

    let client = C::default();
    let SubjectListing { works } = client.get_json(&url)?;

    trace!("Request was successful");

    // An empty listing and a work key without the expected prefix are the
    // same negative result to the caller.
    works
        .into_iter()
        .next()
        .and_then(WorkRef::olid)
        .map(LookupKey::Olid)
        .ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                format!("No works found for the subject of '{subject}'"),
            )
        })
}

pub(crate) fn book_by_key<C: Client>(key: &LookupKey) -> Result<Value, Error> {
    let bib_key = key.bib_key();
    info!("Searching for book metadata with the bib-key '{bib_key}'");
    let url = format!("{BOOKS_URL}?bibkeys={bib_key}&format=json&jscmd=data");

    let client = C::default();
    let envelope: HashMap<String, Value> = client.get_json(&url)?;

    trace!("Request was successful");

    extract(envelope, &bib_key)
}

/// The books endpoint echoes the requested bib-key as the envelope key, so an
/// absent key is the only signal that no such book exists. The inner metadata
/// object is passed through verbatim.
fn extract(mut envelope: HashMap<String, Value>, bib_key: &str) -> Result<Value, Error> {
    envelope.remove(bib_key).ok_or_else(|| {
        Error::new(
            ErrorKind::NotFound,
            format!("No book found for the bib-key of '{bib_key}'"),
        )
    })
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct SubjectListing {
    // The listing omits `works` entirely for an unknown subject, which is the
    // same as an empty listing.
    #[serde(default)]
    works: Vec<WorkRef>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct WorkRef {
    key: String,
}

impl WorkRef {
    fn olid(self) -> Option<String> {
        self.key.strip_prefix("/works/").map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::{json, Value};

    use crate::{
        api::{assert_url, impl_text_producer, MockClient, NetworkErrorProducer},
        Error, ErrorKind, LookupKey,
    };

    const BOOK_ENVELOPE_JSON: &str = include_str!("../../tests/data/openlibrary_book.json");
    const SUBJECT_JSON: &str = include_str!("../../tests/data/subject_history.json");

    impl_text_producer! {
        ValidSubjectProducer => Ok(SUBJECT_JSON.to_owned()),
        EmptyWorksProducer => Ok(
            r#"{
                "works": []
            }"#.to_owned()
        ),
        NoWorksFieldProducer => Ok(
            r#"{
                "key": "/subjects/underwater_basket_weaving"
            }"#.to_owned()
        ),
        TwoWorksProducer => Ok(
            r#"{
                "works": [
                    {"key": "/works/OL12345W"},
                    {"key": "/works/OL99999W"}
                ]
            }"#.to_owned()
        ),
        UnprefixedKeyProducer => Ok(
            r#"{
                "works": [
                    {"key": "OL12345W"}
                ]
            }"#.to_owned()
        ),
        ValidBookProducer => Ok(BOOK_ENVELOPE_JSON.to_owned()),
        EmptyEnvelopeProducer => Ok("{}".to_owned()),
    }

    #[test]
    fn subject_url_format_is_correct() {
        assert!(
            super::first_work_in_subject::<MockClient<ValidSubjectProducer>>("history", 1).is_ok()
        );
        assert_url!("https://openlibrary.org/subjects/history.json?limit=1");
    }

    #[test]
    fn limit_is_embedded_in_subject_url() {
        assert!(
            super::first_work_in_subject::<MockClient<ValidSubjectProducer>>("fantasy", 3).is_ok()
        );
        assert_url!("https://openlibrary.org/subjects/fantasy.json?limit=3");
    }

    #[test]
    fn first_work_key_becomes_olid_lookup_key() {
        let key = super::first_work_in_subject::<MockClient<ValidSubjectProducer>>("history", 1)
            .expect("ValidSubjectProducer contains a work entry");

        assert_eq!(LookupKey::Olid("OL450063W".to_owned()), key);
    }

    #[test]
    fn subsequent_works_are_ignored() {
        let key = super::first_work_in_subject::<MockClient<TwoWorksProducer>>("history", 1)
            .expect("TwoWorksProducer contains work entries");

        assert_eq!(LookupKey::Olid("OL12345W".to_owned()), key);
    }

    #[test]
    fn empty_works_returns_not_found() {
        let err = super::first_work_in_subject::<MockClient<EmptyWorksProducer>>("history", 1)
            .expect_err("EmptyWorksProducer has no work entries");

        assert_eq!(ErrorKind::NotFound, err.kind());
    }

    #[test]
    fn missing_works_field_returns_not_found() {
        let err = super::first_work_in_subject::<MockClient<NoWorksFieldProducer>>(
            "underwater_basket_weaving",
            1,
        )
        .expect_err("NoWorksFieldProducer has no works field");

        assert_eq!(ErrorKind::NotFound, err.kind());
    }

    #[test]
    fn unprefixed_work_key_returns_not_found() {
        let err = super::first_work_in_subject::<MockClient<UnprefixedKeyProducer>>("history", 1)
            .expect_err("UnprefixedKeyProducer work key has no /works/ prefix");

        assert_eq!(ErrorKind::NotFound, err.kind());
    }

    #[test]
    fn network_error_propagates_from_subject_lookup() {
        let err = super::first_work_in_subject::<MockClient<NetworkErrorProducer>>("history", 1)
            .expect_err("NetworkErrorProducer always fails");

        assert_eq!(ErrorKind::Network, err.kind());
    }

    #[test]
    fn isbn_book_url_format_is_correct() {
        let key = LookupKey::Isbn("9780547928227".to_owned());
        assert!(super::book_by_key::<MockClient<ValidBookProducer>>(&key).is_ok());
        assert_url!(
            "https://openlibrary.org/api/books?bibkeys=ISBN:9780547928227&format=json&jscmd=data"
        );
    }

    #[test]
    fn olid_book_url_format_is_correct() {
        let key = LookupKey::Olid("OL12345W".to_owned());
        assert!(super::book_by_key::<MockClient<EmptyEnvelopeProducer>>(&key).is_err());
        assert_url!(
            "https://openlibrary.org/api/books?bibkeys=OLID:OL12345W&format=json&jscmd=data"
        );
    }

    #[test]
    fn metadata_is_returned_verbatim() {
        let key = LookupKey::Isbn("9780547928227".to_owned());
        let book = super::book_by_key::<MockClient<ValidBookProducer>>(&key)
            .expect("ValidBookProducer envelope contains the bib-key");

        assert_eq!(Some("The Hobbit"), book["title"].as_str());
        assert_eq!(Some("J.R.R. Tolkien"), book["authors"][0]["name"].as_str());

        let expected: HashMap<String, Value> = serde_json::from_str(BOOK_ENVELOPE_JSON).unwrap();
        assert_eq!(expected["ISBN:9780547928227"], book);
    }

    #[test]
    fn empty_envelope_returns_not_found() {
        let key = LookupKey::Isbn("0000000000".to_owned());
        let err = super::book_by_key::<MockClient<EmptyEnvelopeProducer>>(&key)
            .expect_err("EmptyEnvelopeProducer has no bib-key entries");

        assert_eq!(ErrorKind::NotFound, err.kind());
    }

    #[test]
    fn envelope_keyed_by_other_bib_key_returns_not_found() {
        let key = LookupKey::Isbn("1111111111".to_owned());
        let err = super::book_by_key::<MockClient<ValidBookProducer>>(&key)
            .expect_err("Envelope is keyed by a different ISBN");

        assert_eq!(ErrorKind::NotFound, err.kind());
    }

    #[test]
    fn network_error_propagates_from_book_lookup() {
        let key = LookupKey::Isbn("9780547928227".to_owned());
        let err = super::book_by_key::<MockClient<NetworkErrorProducer>>(&key)
            .expect_err("NetworkErrorProducer always fails");

        assert_eq!(ErrorKind::Network, err.kind());
    }

    #[test]
    fn extract_uses_the_same_key_the_fetch_builds() {
        // Round trip: an envelope keyed by `bib_key` is always found again by
        // the same `bib_key`.
        for key in [
            LookupKey::Isbn("9780547928227".to_owned()),
            LookupKey::Olid("OL12345W".to_owned()),
        ] {
            let envelope = HashMap::from([(key.bib_key(), json!({"title": "X"}))]);
            let book = super::extract(envelope, &key.bib_key())
                .expect("Envelope was keyed by the same bib-key");
            assert_eq!(json!({"title": "X"}), book);
        }
    }

    #[test]
    fn repeated_lookups_return_identical_metadata() {
        let key = LookupKey::Isbn("9780547928227".to_owned());
        let first = super::book_by_key::<MockClient<ValidBookProducer>>(&key).unwrap();
        let second = super::book_by_key::<MockClient<ValidBookProducer>>(&key).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn extract_error_kind_is_not_found() {
        let err = super::extract(HashMap::new(), "ISBN:0000000000")
            .map_err(|e| e.kind())
            .expect_err("Empty envelope contains no bib-key");

        assert_eq!(ErrorKind::NotFound, err);
    }

    #[test]
    fn error_display_carries_the_bib_key() {
        let err: Error = super::extract(HashMap::new(), "ISBN:0000000000").unwrap_err();
        assert_eq!(
            "Not found: No book found for the bib-key of 'ISBN:0000000000'",
            err.to_string()
        );
    }
}
