use thiserror::Error;

/// Erreurs du client SOAP.
///
/// Every failure is returned to the immediate caller: no retry, no
/// fallback response. The absence of a `Body` element or of character
/// data in a response is *not* an error (see [`crate::scan_body`]).
#[derive(Debug, Error)]
pub enum SoapError {
    #[error("Failed to serialize SOAP request body: {0}")]
    Serialize(#[from] quick_xml::se::SeError),

    #[error("HTTP error when sending SOAP request to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("Failed to read SOAP response body: {0}")]
    BodyRead(#[source] ureq::Error),

    #[error("XML parsing error in SOAP response: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid character reference in SOAP response: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("Unknown entity reference '&{0};' in SOAP response")]
    UnknownEntity(String),

    /// Unmarshal failures keep the response name that was recovered
    /// before decoding failed, so callers can still tell which
    /// operation answered.
    #[error("Failed to unmarshal SOAP response '{name}': {source}")]
    Unmarshal {
        name: String,
        #[source]
        source: quick_xml::de::DeError,
    },
}
