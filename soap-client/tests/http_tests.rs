//! HTTP-level tests for the SOAP client against a mock device

use mockito::{Matcher, Server};
use rstest::rstest;
use soap_client::{SoapClient, SoapError};

const AVT: &str = "urn:schemas-upnp-org:service:AVTransport:1";

fn instance_args() -> Vec<(String, String)> {
    vec![("InstanceID".to_string(), "0".to_string())]
}

#[test]
fn test_call_action_returns_output_arguments() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/AVTransport/ctl")
        .match_header("SOAPACTION", format!("\"{}#GetTransportInfo\"", AVT).as_str())
        .match_body(Matcher::Regex("<InstanceID>0</InstanceID>".to_string()))
        .with_status(200)
        .with_header("content-type", "text/xml; charset=\"utf-8\"")
        .with_body(
            r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <u:GetTransportInfoResponse xmlns:u="urn:schemas-upnp-org:service:AVTransport:1">
      <CurrentTransportState>PAUSED_PLAYBACK</CurrentTransportState>
      <CurrentTransportStatus>OK</CurrentTransportStatus>
      <CurrentSpeed>1</CurrentSpeed>
    </u:GetTransportInfoResponse>
  </s:Body>
</s:Envelope>"#,
        )
        .create();

    let client = SoapClient::new();
    let url = format!("{}/AVTransport/ctl", server.url());
    let out = client
        .call_action(&url, AVT, "GetTransportInfo", &instance_args())
        .expect("call should succeed");

    mock.assert();
    assert_eq!(out["CurrentTransportState"], "PAUSED_PLAYBACK");
    assert_eq!(out["CurrentTransportStatus"], "OK");
}

#[rstest]
#[case(701)]
#[case(402)]
fn test_http_500_with_fault_maps_to_upnp_code(#[case] code: u16) {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/ctl")
        .with_status(500)
        .with_body(format!(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><s:Fault>
<faultcode>s:Client</faultcode><faultstring>UPnPError</faultstring>
<detail><UPnPError xmlns="urn:schemas-upnp-org:control-1-0"><errorCode>{}</errorCode></UPnPError></detail>
</s:Fault></s:Body></s:Envelope>"#,
            code
        ))
        .create();

    let client = SoapClient::new();
    let err = client
        .call_action(&format!("{}/ctl", server.url()), AVT, "Play", &instance_args())
        .unwrap_err();

    match err {
        SoapError::Fault(c) => assert_eq!(c, code),
        other => panic!("Expected fault, got {:?}", other),
    }
}

#[test]
fn test_http_error_without_fault_body() {
    let mut server = Server::new();
    let _mock = server.mock("POST", "/ctl").with_status(404).create();

    let client = SoapClient::new();
    let err = client
        .call_action(&format!("{}/ctl", server.url()), AVT, "Stop", &instance_args())
        .unwrap_err();

    assert!(matches!(err, SoapError::Http(404)));
    assert!(!err.is_fault());
}

#[test]
fn test_garbage_body_is_parse_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/ctl")
        .with_status(200)
        .with_body("this is not xml")
        .create();

    let client = SoapClient::new();
    let err = client
        .call_action(&format!("{}/ctl", server.url()), AVT, "Stop", &instance_args())
        .unwrap_err();

    assert!(matches!(err, SoapError::Parse(_)));
}
