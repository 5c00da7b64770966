//! # pmosoap - Client SOAP minimal
//!
//! Ce module implémente un assistant SOAP 1.1 minimal: il enveloppe un
//! payload sérialisable, l'envoie en POST HTTP et extrait le nom et le
//! contenu du corps de la réponse sans matérialiser le document.
//!
//! ## Fonctionnalités
//!
//! - ✅ Construction d'enveloppes SOAP 1.1
//! - ✅ POST HTTP synchrone (une requête par appel)
//! - ✅ Scan en flux de la réponse, arrêt à la première donnée textuelle
//! - ✅ Désérialisation optionnelle de la réponse complète
//! - ✅ Résolution de préfixes de namespace par chaîne parentale
//!
//! ## Architecture
//!
//! - [`SoapClient`] : poignée immuable (URL du service, namespace)
//! - [`build_envelope`] : construction de l'enveloppe
//! - [`scan_body`] / [`SoapResponse`] : scanner de réponse en flux
//! - [`NamespaceNode`] : arbre de résolution de préfixes
//! - [`SoapError`] : erreurs du client
//!
//! ## Example
//!
//! ```ignore
//! use pmosoap::SoapClient;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! #[serde(rename = "getPortalRequest")]
//! struct GetPortalRequest {
//!     #[serde(rename = "CustAccount")]
//!     cust_account: String,
//! }
//!
//! let client = SoapClient::new(
//!     "http://portal.example.com/services/portal",
//!     "http://www.bnet.cn/v3.0",
//! );
//!
//! let response = client.request(&GetPortalRequest {
//!     cust_account: "test0721".to_string(),
//! })?;
//! println!("{} -> {} bytes", response.name, response.content.len());
//! # Ok::<(), pmosoap::SoapError>(())
//! ```

pub mod client;
pub mod envelope;
pub mod errors;
pub mod namespace;
pub mod scanner;

pub use client::SoapClient;
pub use envelope::{SOAP_ENVELOPE_NS, build_envelope};
pub use errors::SoapError;
pub use namespace::NamespaceNode;
pub use scanner::{SoapResponse, scan_body};
