//! Client SOAP synchrone: enveloppe, POST HTTP, extraction de la réponse.

use std::io::BufReader;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;

use crate::envelope::build_envelope;
use crate::errors::SoapError;
use crate::scanner::{SoapResponse, scan_body};

/// Poignée de client SOAP: URL du service et namespace cible.
///
/// Immutable after construction, so a single handle can serve
/// independent requests from several threads; every call builds its own
/// envelope, connection and scanner state.
#[derive(Debug, Clone)]
pub struct SoapClient {
    service_url: String,
    namespace: String,
}

impl SoapClient {
    pub fn new(service_url: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            namespace: namespace.into(),
        }
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Target namespace of the service. Carried as configuration for
    /// callers building their payloads; the request path itself does
    /// not consume it.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Envoie `payload` et extrait (nom, contenu) de la réponse en flux.
    ///
    /// The response body is scanned as a token stream and never fully
    /// buffered: the call returns as soon as the first character-data
    /// run is found (see [`scan_body`] for the exact contract,
    /// including its quirks). An empty name or content is a valid
    /// result, not an error.
    pub fn request<B: Serialize>(&self, payload: &B) -> Result<SoapResponse, SoapError> {
        let response = self.post(build_envelope(payload)?)?;
        let (_parts, body) = response.into_parts();

        scan_body(BufReader::new(body.into_reader()))
    }

    /// Envoie `payload` et désérialise la réponse complète dans `R`.
    ///
    /// The full body is read, the scanner runs over those bytes for the
    /// response name, then the whole document (not the scanned
    /// fragment) is unmarshaled into `R`. An unmarshal failure is
    /// reported as [`SoapError::Unmarshal`], keeping the recovered
    /// response name; transport failures are reported separately.
    pub fn request_as<B, R>(&self, payload: &B) -> Result<(String, R), SoapError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let mut response = self.post(build_envelope(payload)?)?;
        let raw_body = response
            .body_mut()
            .read_to_string()
            .map_err(SoapError::BodyRead)?;

        let scanned = scan_body(raw_body.as_bytes())?;

        match quick_xml::de::from_str(&raw_body) {
            Ok(value) => Ok((scanned.name, value)),
            Err(source) => Err(SoapError::Unmarshal {
                name: scanned.name,
                source,
            }),
        }
    }

    /// Envoie `payload` et renvoie le corps de la réponse tel quel.
    ///
    /// Bypasses the scanner entirely; useful to inspect what a service
    /// actually answers.
    pub fn request_raw<B: Serialize>(&self, payload: &B) -> Result<String, SoapError> {
        let mut response = self.post(build_envelope(payload)?)?;

        response
            .body_mut()
            .read_to_string()
            .map_err(SoapError::BodyRead)
    }

    /// Un POST unique de l'enveloppe sérialisée vers l'URL du service.
    ///
    /// HTTP status codes are deliberately not treated as errors: SOAP
    /// services answer faults with 500 and a readable body, so the
    /// response is handed back whatever the status. No retry, no
    /// timeout, no connection reuse.
    fn post(&self, body_xml: String) -> Result<ureq::http::Response<ureq::Body>, SoapError> {
        debug!(url = %self.service_url, "sending SOAP request");

        let config = Agent::config_builder()
            .http_status_as_error(false)
            .build();
        let agent: Agent = config.into();

        agent
            .post(&self.service_url)
            .header("Content-Type", r#"text/xml; charset="utf-8""#)
            .send(body_xml)
            .map_err(|source| SoapError::Transport {
                url: self.service_url.clone(),
                source,
            })
    }
}
