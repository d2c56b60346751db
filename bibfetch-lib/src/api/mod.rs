use serde::de::DeserializeOwned;

pub(crate) mod open_library;
pub(crate) mod schema_rpc;

pub trait Client
where
    Self: Default,
{
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
    fn post_json<T>(
        &self,
        url: &str,
        headers: &[(&str, String)],
        body: &serde_json::Value,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| Error::wrap(ErrorKind::Network, e))
            .and_then(|r| r.json().map_err(|e| Error::wrap(ErrorKind::Network, e)))
    }

    fn post_json<T>(
        &self,
        url: &str,
        headers: &[(&str, String)],
        body: &serde_json::Value,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let mut request = self.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        request
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| Error::wrap(ErrorKind::Network, e))
            .and_then(|r| r.json().map_err(|e| Error::wrap(ErrorKind::Network, e)))
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_text_producer, MockClient, NetworkErrorProducer, Producer, BODY_SINK,
    HEADER_SINK, URL_SINK,
};

use crate::{Error, ErrorKind};
