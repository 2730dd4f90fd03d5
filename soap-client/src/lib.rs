//! Private SOAP client for UPnP action invocation
//!
//! This crate provides a minimal blocking SOAP client for invoking actions on
//! UPnP services (AVTransport, ContentDirectory, OpenHome, ...). It knows
//! nothing about the services themselves: callers hand it a control URL, a
//! service type, an action name and an ordered list of string arguments, and
//! get back the action's output arguments.

mod config;
mod error;

pub use config::SoapConfig;
pub use error::SoapError;

use std::collections::HashMap;

use quick_xml::escape::escape;
use tracing::{debug, warn};
use xmltree::{Element, XMLNode};

/// A minimal SOAP client for UPnP device communication
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
}

impl SoapClient {
    /// Create a new SOAP client with default configuration
    pub fn new() -> Self {
        Self::with_config(&SoapConfig::default())
    }

    /// Create a SOAP client with explicit timeouts
    pub fn with_config(config: &SoapConfig) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(config.connect_timeout)
                .timeout_read(config.read_timeout)
                .user_agent(&config.user_agent)
                .build(),
        }
    }

    /// Invoke `action` on the service at `control_url` and return the parsed
    /// `<actionResponse>` element
    ///
    /// Argument values are XML-escaped; their order is preserved on the wire.
    pub fn call(
        &self,
        control_url: &str,
        service_type: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<Element, SoapError> {
        let body = build_envelope(service_type, action, args);
        let soap_action = format!("\"{}#{}\"", service_type, action);

        debug!(control_url, action, "sending SOAP request");

        let xml_text = match self
            .agent
            .post(control_url)
            .set("Content-Type", "text/xml; charset=\"utf-8\"")
            .set("SOAPACTION", &soap_action)
            .send_string(&body)
        {
            Ok(response) => response
                .into_string()
                .map_err(|e| SoapError::Network(e.to_string()))?,
            // UPnP reports action errors as HTTP 500 with a fault body
            Err(ureq::Error::Status(status, response)) => {
                let text = response.into_string().unwrap_or_default();
                return Err(fault_from_body(&text).unwrap_or(SoapError::Http(status)));
            }
            Err(e) => return Err(SoapError::Network(e.to_string())),
        };

        let xml = Element::parse(xml_text.as_bytes())
            .map_err(|e| SoapError::Parse(e.to_string()))?;

        // Extract response or handle SOAP fault
        self.extract_response(&xml, action)
    }

    /// Invoke an action and flatten its output arguments into a name/value map
    pub fn call_action(
        &self,
        control_url: &str,
        service_type: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<HashMap<String, String>, SoapError> {
        let response = self.call(control_url, service_type, action, args)?;
        Ok(response_arguments(&response))
    }

    fn extract_response(&self, xml: &Element, action: &str) -> Result<Element, SoapError> {
        let body = xml
            .get_child("Body")
            .ok_or_else(|| SoapError::Parse("Missing SOAP Body".to_string()))?;

        // Check for SOAP fault first
        if let Some(fault) = body.get_child("Fault") {
            return Err(SoapError::Fault(fault_code(fault)));
        }

        // Extract the action response
        let response_name = format!("{}Response", action);
        body.get_child(response_name.as_str())
            .cloned()
            .ok_or_else(|| SoapError::Parse(format!("Missing {} element", response_name)))
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the SOAP envelope for one action
fn build_envelope(service_type: &str, action: &str, args: &[(String, String)]) -> String {
    let payload: String = args
        .iter()
        .map(|(name, value)| format!("<{name}>{}</{name}>", escape(value.as_str())))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
<s:Body>
<u:{action} xmlns:u="{service_type}">{payload}</u:{action}>
</s:Body>
</s:Envelope>"#
    )
}

/// Output arguments of an action response, keyed by element name
///
/// Empty elements map to the empty string.
pub fn response_arguments(response: &Element) -> HashMap<String, String> {
    response
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(e) => Some((
                e.name.clone(),
                e.get_text().map(|t| t.into_owned()).unwrap_or_default(),
            )),
            _ => None,
        })
        .collect()
}

fn fault_code(fault: &Element) -> u16 {
    fault
        .get_child("detail")
        .and_then(|d| d.get_child("UPnPError").or_else(|| d.get_child("UpnPError")))
        .and_then(|e| e.get_child("errorCode"))
        .and_then(|c| c.get_text())
        .and_then(|t| t.trim().parse::<u16>().ok())
        .unwrap_or(500)
}

fn fault_from_body(text: &str) -> Option<SoapError> {
    let xml = Element::parse(text.as_bytes()).ok()?;
    let fault = xml.get_child("Body")?.get_child("Fault")?;
    let code = fault_code(fault);
    warn!(code, "SOAP fault returned by device");
    Some(SoapError::Fault(code))
}
