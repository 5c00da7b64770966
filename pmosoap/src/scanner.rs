//! Analyse en flux de la réponse SOAP
//!
//! Un seul passage avant sur les évènements XML, sans matérialiser
//! d'arbre: le scan s'arrête à la première donnée textuelle rencontrée.

use std::io::BufRead;

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::Event;
use quick_xml::{Error as XmlError, Reader};
use tracing::trace;

use crate::errors::SoapError;

/// Résultat d'un scan de réponse SOAP:
/// - nom local du dernier élément ouvert après `<Body>`
/// - première donnée textuelle du document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoapResponse {
    /// Empty if no start tag was seen after entering `Body`.
    pub name: String,
    /// Empty if the stream ended before any character data.
    pub content: Vec<u8>,
}

/// Scanne le corps d'une réponse SOAP en flux.
///
/// Walks the token stream once and returns:
///
/// - `name`: the local name of the last start tag seen after a `Body`
///   start tag (every start tag overwrites it until the scan ends, so
///   nested elements leave the innermost name);
/// - `content`: the first contiguous character-data run of the
///   document, with character and predefined entity references
///   resolved, otherwise verbatim. The run ends at the next piece of
///   markup and ends the scan with it, so the cost is O(position of
///   the first content).
///
/// Known quirk, kept on purpose: content capture is active from the
/// very first token, not from `<Body>`. Character data appearing before
/// the body (including inter-tag whitespace in pretty-printed
/// documents) ends the scan and is returned as the content. Callers
/// working with compact, well-formed responses never see the
/// difference.
///
/// A missing `Body`, a document with no text at all, or a mismatched
/// end tag is not an error: scanning simply runs out of tokens and the
/// untouched fields come back empty. Only a stream that cannot be
/// tokenized fails.
pub fn scan_body<R: BufRead>(reader: R) -> Result<SoapResponse, SoapError> {
    let mut reader = Reader::from_reader(reader);
    // Unexpected nesting is tolerated, only syntax errors propagate.
    reader.config_mut().check_end_names = false;

    let mut response = SoapResponse::default();
    let mut seen_body = false;
    // Never cleared: text before <Body> is captured too (see above).
    let capturing_content = true;
    // True once the current character-data run has started.
    let mut in_content = false;

    let mut content = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => {
                if in_content {
                    break;
                }
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if seen_body {
                    response.name = local.clone();
                }
                // Checked after the capture above, so the Body tag
                // itself is never recorded as the response name.
                if local == "Body" {
                    seen_body = true;
                }
            }
            Event::Text(e) => {
                if capturing_content {
                    let raw = e.decode().map_err(XmlError::Encoding)?;
                    content.push_str(&unescape(&raw)?);
                    in_content = true;
                }
            }
            Event::GeneralRef(e) => {
                // References are part of the surrounding run, resolved
                // the way the document author escaped them.
                if capturing_content {
                    if let Some(ch) = e.resolve_char_ref()? {
                        content.push(ch);
                    } else {
                        let name = e.decode().map_err(XmlError::Encoding)?;
                        let resolved = resolve_predefined_entity(&name)
                            .ok_or_else(|| SoapError::UnknownEntity(name.into_owned()))?;
                        content.push_str(resolved);
                    }
                    in_content = true;
                }
            }
            Event::CData(e) => {
                // A CDATA section is a character-data run of its own,
                // taken verbatim.
                if capturing_content {
                    if !in_content {
                        response.content = e.into_inner().into_owned();
                    }
                    break;
                }
            }
            Event::End(_) => {
                if in_content {
                    break;
                }
            }
            Event::Eof => break,
            other => {
                if in_content {
                    break;
                }
                trace!(event = ?other, "ignoring XML event in SOAP response");
            }
        }

        buf.clear();
    }

    if in_content {
        response.content = content.into_bytes();
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_simple_response() {
        let xml = "<Envelope><Body><Foo>hello</Foo></Body></Envelope>";

        let response = scan_body(xml.as_bytes()).unwrap();
        assert_eq!(response.name, "Foo");
        assert_eq!(response.content, b"hello");
    }

    #[test]
    fn test_scan_prefixed_names_use_local_part() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><u:GetPriceResponse xmlns:u="urn:example">1.90</u:GetPriceResponse></s:Body></s:Envelope>"#;

        let response = scan_body(xml.as_bytes()).unwrap();
        assert_eq!(response.name, "GetPriceResponse");
        assert_eq!(response.content, b"1.90");
    }

    /// Content capture is active from the first token: text before
    /// <Body> wins, and no name is recorded.
    #[test]
    fn test_scan_text_before_body_is_captured() {
        let xml = "<Envelope>oops<Body><Foo>hello</Foo></Body></Envelope>";

        let response = scan_body(xml.as_bytes()).unwrap();
        assert_eq!(response.name, "");
        assert_eq!(response.content, b"oops");
    }

    /// No character data anywhere: the whole stream is consumed, the
    /// content comes back empty and the name still points at the
    /// element seen inside Body.
    #[test]
    fn test_scan_no_character_data() {
        let xml = "<Envelope><Body><Foo/></Body></Envelope>";

        let response = scan_body(xml.as_bytes()).unwrap();
        assert_eq!(response.name, "Foo");
        assert_eq!(response.content, b"");
    }

    /// Every start tag after Body overwrites the name, so the element
    /// closest to the first text run is the one retained.
    #[test]
    fn test_scan_nested_elements_record_deepest_start_tag() {
        let xml = "<Envelope><Body><A><B>x</B></A></Body></Envelope>";

        let response = scan_body(xml.as_bytes()).unwrap();
        assert_eq!(response.name, "B");
        assert_eq!(response.content, b"x");
    }

    /// The Body element itself is never recorded as the response name.
    #[test]
    fn test_scan_body_only() {
        let xml = "<Envelope><Body></Body></Envelope>";

        let response = scan_body(xml.as_bytes()).unwrap();
        assert_eq!(response.name, "");
        assert_eq!(response.content, b"");
    }

    #[test]
    fn test_scan_empty_document() {
        let response = scan_body(&b""[..]).unwrap();
        assert_eq!(response.name, "");
        assert_eq!(response.content, b"");
    }

    /// Entity-encoded inner XML (the usual shape of SOAP string
    /// returns) comes back decoded as one run.
    #[test]
    fn test_scan_resolves_references_in_content() {
        let xml = "<Envelope><Body><GetPortalRequestResponse>&lt;Package&gt;&lt;OPFlag&gt;0101&lt;/OPFlag&gt;&lt;/Package&gt;</GetPortalRequestResponse></Body></Envelope>";

        let response = scan_body(xml.as_bytes()).unwrap();
        assert_eq!(response.name, "GetPortalRequestResponse");
        assert_eq!(response.content, b"<Package><OPFlag>0101</OPFlag></Package>");
    }

    #[test]
    fn test_scan_resolves_char_references() {
        let xml = "<Envelope><Body><Foo>a&#x41;&amp;b</Foo></Body></Envelope>";

        let response = scan_body(xml.as_bytes()).unwrap();
        assert_eq!(response.content, b"aA&b");
    }

    #[test]
    fn test_scan_cdata_is_character_data() {
        let xml = "<Envelope><Body><Foo><![CDATA[<raw>&amp;</raw>]]></Foo></Body></Envelope>";

        let response = scan_body(xml.as_bytes()).unwrap();
        assert_eq!(response.name, "Foo");
        assert_eq!(response.content, b"<raw>&amp;</raw>");
    }

    /// Comments and processing instructions are ignored; the scan keeps
    /// going until real character data shows up.
    #[test]
    fn test_scan_skips_non_content_events() {
        let xml =
            "<?xml version=\"1.0\"?><Envelope><!-- noise --><Body><Foo>hello</Foo></Body></Envelope>";

        let response = scan_body(xml.as_bytes()).unwrap();
        assert_eq!(response.name, "Foo");
        assert_eq!(response.content, b"hello");
    }

    /// A mismatched end tag is a token-level anomaly, not a scan
    /// failure: the scanner only ever runs out of tokens.
    #[test]
    fn test_scan_tolerates_mismatched_end_tags() {
        let xml = "<Envelope><Body></Wrong></Envelope>";

        let response = scan_body(xml.as_bytes()).unwrap();
        assert_eq!(response.name, "");
        assert_eq!(response.content, b"");
    }

    /// A stream that cannot be tokenized at all propagates an error
    /// instead of silently returning empty results.
    #[test]
    fn test_scan_untokenizable_stream_is_an_error() {
        let xml = "<Envelope><Body><Foo";

        assert!(scan_body(xml.as_bytes()).is_err());
    }
}
