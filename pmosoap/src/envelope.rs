//! Construction de l'enveloppe SOAP 1.1

use serde::Serialize;

use crate::errors::SoapError;

/// Namespace de l'enveloppe SOAP 1.1
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Construit l'enveloppe SOAP autour d'un payload sérialisable.
///
/// The payload is serialized with `quick_xml::se::to_string`, so its
/// root element is the payload struct's name (or its `#[serde(rename)]`
/// override), then wrapped as:
///
/// ```xml
/// <Envelope xmlns="http://schemas.xmlsoap.org/soap/envelope/"><Body>...</Body></Envelope>
/// ```
///
/// No XML declaration is emitted. The only failure mode is payload
/// serialization; envelope assembly itself cannot fail.
pub fn build_envelope<B: Serialize>(payload: &B) -> Result<String, SoapError> {
    let body = quick_xml::se::to_string(payload)?;

    let mut xml = String::with_capacity(body.len() + 96);
    xml.push_str(r#"<Envelope xmlns=""#);
    xml.push_str(SOAP_ENVELOPE_NS);
    xml.push_str(r#"">"#);
    xml.push_str("<Body>");
    xml.push_str(&body);
    xml.push_str("</Body></Envelope>");

    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename = "GetPrice")]
    struct GetPrice {
        #[serde(rename = "Item")]
        item: String,
    }

    #[test]
    fn test_build_envelope() {
        let payload = GetPrice {
            item: "Apples".to_string(),
        };

        let xml = build_envelope(&payload).unwrap();

        assert_eq!(
            xml,
            r#"<Envelope xmlns="http://schemas.xmlsoap.org/soap/envelope/"><Body><GetPrice><Item>Apples</Item></GetPrice></Body></Envelope>"#
        );
    }

    #[test]
    fn test_build_envelope_renames_payload_root() {
        #[derive(Serialize)]
        #[serde(rename = "Stop")]
        struct Stop {}

        let xml = build_envelope(&Stop {}).unwrap();

        assert!(xml.starts_with(r#"<Envelope xmlns="http://schemas.xmlsoap.org/soap/envelope/">"#));
        assert!(xml.contains("<Body><Stop/></Body>"));
    }

    /// Round trip: scanning the serialized envelope yields the
    /// payload's own character data as content.
    #[test]
    fn test_envelope_round_trip_through_scanner() {
        #[derive(Serialize)]
        #[serde(rename = "StreamingNo")]
        struct StreamingNo(String);

        let payload = StreamingNo("20180712161944641269".to_string());
        let xml = build_envelope(&payload).unwrap();

        let response = crate::scan_body(xml.as_bytes()).unwrap();
        assert_eq!(response.name, "StreamingNo");
        assert_eq!(response.content, b"20180712161944641269");
    }
}
