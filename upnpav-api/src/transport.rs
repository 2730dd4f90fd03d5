//! The transport collaborator seam
//!
//! Everything above this trait deals in typed arguments and results;
//! everything below it (HTTP, SOAP envelopes, timeouts) belongs to the
//! implementation. The real implementation is [`soap_client::SoapClient`];
//! tests substitute spies.

use soap_client::{SoapClient, SoapError};

use crate::property_set::PropertySet;

/// Sends one action to a remote service and returns its output arguments
pub trait ActionTransport {
    /// Invoke `action` of `service_type` at `control_url` with the ordered
    /// input arguments `args`
    fn invoke_action(
        &self,
        control_url: &str,
        service_type: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<PropertySet, SoapError>;
}

impl ActionTransport for SoapClient {
    fn invoke_action(
        &self,
        control_url: &str,
        service_type: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<PropertySet, SoapError> {
        self.call_action(control_url, service_type, action, args)
    }
}

impl<T: ActionTransport + ?Sized> ActionTransport for &T {
    fn invoke_action(
        &self,
        control_url: &str,
        service_type: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<PropertySet, SoapError> {
        (**self).invoke_action(control_url, service_type, action, args)
    }
}
