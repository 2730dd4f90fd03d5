//! Action invocation against a recording transport

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use rstest::rstest;
use soap_client::SoapError;
use upnpav_api::{
    status, status_of, AVTransportService, ActionTransport, ApiError, ContentDirectoryService,
    BrowseConfig, DeviceCapabilities, PlayMode, PropertySet, SeekMode, TransportState,
    TransportStatus,
};

#[derive(Debug, Clone, PartialEq)]
struct Call {
    control_url: String,
    service_type: String,
    action: String,
    args: Vec<(String, String)>,
}

/// Records every call and answers from a queue of canned outcomes
#[derive(Default)]
struct SpyTransport {
    calls: RefCell<Vec<Call>>,
    replies: RefCell<VecDeque<Result<PropertySet, SoapError>>>,
}

impl SpyTransport {
    fn replying(replies: Vec<Result<PropertySet, SoapError>>) -> Self {
        Self {
            calls: RefCell::default(),
            replies: RefCell::new(replies.into()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl ActionTransport for SpyTransport {
    fn invoke_action(
        &self,
        control_url: &str,
        service_type: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<PropertySet, SoapError> {
        self.calls.borrow_mut().push(Call {
            control_url: control_url.to_string(),
            service_type: service_type.to_string(),
            action: action.to_string(),
            args: args.to_vec(),
        });
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(PropertySet::new()))
    }
}

fn props(pairs: &[(&str, &str)]) -> PropertySet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn pairs(args: &[(&str, &str)]) -> Vec<(String, String)> {
    args.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[rstest]
#[case("SEEK_FORWARD")]
#[case("TAPE_INDEX")]
#[case("")]
fn test_seek_with_unmapped_mode_never_reaches_transport(#[case] mode: &str) {
    let spy = SpyTransport::default();
    let avt = AVTransportService::new(&spy, "http://renderer/avt");

    let result = avt.seek(mode, 10);

    assert!(matches!(result, Err(ApiError::InvalidParameter(_))));
    assert_eq!(status_of(&result), status::INVALID_PARAM);
    assert!(spy.calls().is_empty());
}

#[test]
fn test_seek_sends_seek_action_with_time_target() {
    let spy = SpyTransport::default();
    let avt = AVTransportService::new(&spy, "http://renderer/avt");

    avt.seek("rel_time", 3725).unwrap();
    avt.seek_to(SeekMode::TrackNr, 4).unwrap();

    let calls = spy.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].action, "Seek");
    assert_eq!(
        calls[0].args,
        pairs(&[("InstanceID", "0"), ("Unit", "REL_TIME"), ("Target", "1:02:05")])
    );
    assert_eq!(
        calls[1].args,
        pairs(&[("InstanceID", "0"), ("Unit", "TRACK_NR"), ("Target", "4")])
    );
}

#[test]
fn test_failed_query_populates_nothing() {
    let spy = SpyTransport::replying(vec![Err(SoapError::Fault(718))]);
    let avt = AVTransportService::new(&spy, "http://renderer/avt");

    let result = avt.get_transport_info();

    assert_eq!(status_of(&result), 718);
    assert!(result.is_err());
}

#[test]
fn test_network_failure_is_socket_status() {
    let spy = SpyTransport::replying(vec![Err(SoapError::Network("refused".into()))]);
    let avt = AVTransportService::new(&spy, "http://renderer/avt");

    assert_eq!(status_of(&avt.stop()), status::SOCKET_CONNECT);
    assert_eq!(spy.calls().len(), 1);
}

#[test]
fn test_transport_info_query() {
    let spy = SpyTransport::replying(vec![Ok(props(&[
        ("CurrentTransportState", "PLAYING"),
        ("CurrentTransportStatus", "OK"),
        ("CurrentSpeed", "1"),
    ]))]);
    let avt = AVTransportService::new(&spy, "http://renderer/avt").with_instance_id(2);

    let info = avt.get_transport_info().unwrap();

    assert_eq!(info.state, TransportState::Playing);
    assert_eq!(info.status, TransportStatus::Ok);
    let calls = spy.calls();
    assert_eq!(calls[0].service_type, "urn:schemas-upnp-org:service:AVTransport:1");
    assert_eq!(calls[0].action, "GetTransportInfo");
    assert_eq!(calls[0].args, pairs(&[("InstanceID", "2")]));
}

const UNDECLARED_DIDL: &str = r#"<DIDL-Lite><item id="5" parentID="0"><dc:title>Radio</dc:title><upnp:class>object.item.audioItem.audioBroadcast</upnp:class></item></DIDL-Lite>"#;

/// Output arguments of every AVTransport query at once
fn canned_outputs() -> PropertySet {
    props(&[
        ("NrTracks", "3"),
        ("MediaDuration", "0:42:00"),
        ("CurrentURI", "http://h/queue"),
        ("CurrentURIMetaData", UNDECLARED_DIDL),
        ("NextURI", "http://h/next.flac"),
        ("PlayMedium", "NETWORK"),
        ("WriteStatus", "NOT_IMPLEMENTED"),
        ("CurrentTransportState", "PAUSED_PLAYBACK"),
        ("CurrentTransportStatus", "OK"),
        ("CurrentSpeed", "1"),
        ("Track", "2"),
        ("TrackDuration", "0:03:58"),
        ("TrackMetaData", UNDECLARED_DIDL),
        ("TrackURI", "http://h/2.flac"),
        ("RelTime", "0:01:05"),
        ("RelCount", "2147483647"),
        ("PlayMedia", "NETWORK,HDD"),
        ("RecMedia", "NOT_IMPLEMENTED"),
        ("RecQualityModes", "NOT_IMPLEMENTED"),
        ("PlayMode", "REPEAT_ALL"),
        ("RecQualityMode", "NOT_IMPLEMENTED"),
        ("Actions", "Play,Stop,Pause,Seek,Next,Previous"),
    ])
}

fn avt(spy: &SpyTransport) -> AVTransportService<&SpyTransport> {
    AVTransportService::new(spy, "http://renderer/avt")
}

#[rstest]
#[case::pause("Pause", |spy: &SpyTransport| avt(spy).pause().unwrap())]
#[case::next("Next", |spy: &SpyTransport| avt(spy).next().unwrap())]
#[case::previous("Previous", |spy: &SpyTransport| avt(spy).previous().unwrap())]
#[case::stop("Stop", |spy: &SpyTransport| avt(spy).stop().unwrap())]
#[case::media_info("GetMediaInfo", |spy: &SpyTransport| {
    let info = avt(spy).get_media_info().unwrap();
    assert_eq!(info.nr_tracks, 3);
    assert_eq!(info.media_duration, Duration::from_secs(2520));
    assert_eq!(info.current_uri, "http://h/queue");
    assert_eq!(info.current_uri_metadata.first_item().unwrap().title, "Radio");
    assert_eq!(info.next_uri, "http://h/next.flac");
    assert!(info.next_uri_metadata.is_empty());
    assert_eq!(info.play_medium, "NETWORK");
    assert_eq!(info.record_medium, "");
})]
#[case::transport_info("GetTransportInfo", |spy: &SpyTransport| {
    let info = avt(spy).get_transport_info().unwrap();
    assert_eq!(info.state, TransportState::PausedPlayback);
    assert_eq!(info.speed, 1);
})]
#[case::position_info("GetPositionInfo", |spy: &SpyTransport| {
    let info = avt(spy).get_position_info().unwrap();
    assert_eq!(info.track, 2);
    assert_eq!(info.track_duration, Duration::from_secs(238));
    assert_eq!(
        info.track_metadata.first_item().unwrap().class,
        "object.item.audioItem.audioBroadcast"
    );
    assert_eq!(info.track_uri, "http://h/2.flac");
    assert_eq!(info.rel_time, Duration::from_secs(65));
    assert_eq!(info.abs_time, Duration::ZERO);
    assert_eq!(info.rel_count, 2147483647);
    assert_eq!(info.abs_count, 0);
})]
#[case::device_capabilities("GetDeviceCapabilities", |spy: &SpyTransport| {
    let caps = avt(spy).get_device_capabilities().unwrap();
    assert_eq!(
        caps,
        DeviceCapabilities {
            play_media: "NETWORK,HDD".into(),
            rec_media: "NOT_IMPLEMENTED".into(),
            rec_quality_modes: "NOT_IMPLEMENTED".into(),
        }
    );
})]
#[case::transport_settings("GetTransportSettings", |spy: &SpyTransport| {
    let settings = avt(spy).get_transport_settings().unwrap();
    assert_eq!(settings.play_mode, PlayMode::RepeatAll);
    assert_eq!(settings.rec_quality_mode, "NOT_IMPLEMENTED");
})]
#[case::current_transport_actions("GetCurrentTransportActions", |spy: &SpyTransport| {
    let actions = avt(spy).get_current_transport_actions().unwrap();
    assert_eq!(actions, "Play,Stop,Pause,Seek,Next,Previous");
})]
fn test_instance_operations_send_action_and_project_outputs(
    #[case] action: &str,
    #[case] run: fn(&SpyTransport),
) {
    let spy = SpyTransport::replying(vec![Ok(canned_outputs())]);

    run(&spy);

    let calls = spy.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].service_type, "urn:schemas-upnp-org:service:AVTransport:1");
    assert_eq!(calls[0].control_url, "http://renderer/avt");
    assert_eq!(calls[0].action, action);
    assert_eq!(calls[0].args, pairs(&[("InstanceID", "0")]));
}

#[test]
fn test_mutations_encode_arguments_in_order() {
    let spy = SpyTransport::default();
    let avt = AVTransportService::new(&spy, "http://renderer/avt");

    avt.play(1).unwrap();
    avt.set_av_transport_uri("http://h/a.flac", "<DIDL-Lite/>").unwrap();
    avt.set_next_av_transport_uri("http://h/b.flac", "").unwrap();
    avt.set_play_mode(PlayMode::Shuffle).unwrap();

    let calls = spy.calls();
    let actions: Vec<_> = calls.iter().map(|c| c.action.as_str()).collect();
    assert_eq!(
        actions,
        ["Play", "SetAVTransportURI", "SetNextAVTransportURI", "SetPlayMode"]
    );
    assert_eq!(calls[0].args, pairs(&[("InstanceID", "0"), ("Speed", "1")]));
    assert_eq!(
        calls[1].args,
        pairs(&[
            ("InstanceID", "0"),
            ("CurrentURI", "http://h/a.flac"),
            ("CurrentURIMetaData", "<DIDL-Lite/>"),
        ])
    );
    assert_eq!(calls[2].args[1], ("NextURI".to_string(), "http://h/b.flac".to_string()));
    assert_eq!(calls[3].args[1], ("NewPlayMode".to_string(), "SHUFFLE".to_string()));
}

#[test]
fn test_set_unknown_play_mode_is_rejected_locally() {
    let spy = SpyTransport::default();
    let avt = AVTransportService::new(&spy, "http://renderer/avt");

    assert_eq!(status_of(&avt.set_play_mode(PlayMode::Unknown)), status::INVALID_PARAM);
    assert!(spy.calls().is_empty());
}

fn browse_page(ids: &[&str], total: usize) -> Result<PropertySet, SoapError> {
    let items: String = ids
        .iter()
        .map(|id| format!(r#"<item id="{id}" parentID="0"><dc:title>t{id}</dc:title></item>"#))
        .collect();
    let didl = format!(
        r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/">{}</DIDL-Lite>"#,
        items
    );
    Ok(props(&[
        ("Result", didl.as_str()),
        ("NumberReturned", ids.len().to_string().as_str()),
        ("TotalMatches", total.to_string().as_str()),
    ]))
}

#[test]
fn test_read_dir_pages_until_total_matches() {
    let spy = SpyTransport::replying(vec![
        browse_page(&["1", "2"], 5),
        browse_page(&["3", "4"], 5),
        browse_page(&["5"], 5),
    ]);
    let cds = ContentDirectoryService::with_config(
        &spy,
        "http://server/cds",
        BrowseConfig::new().with_page_size(2),
    );

    let content = cds.read_dir("0").unwrap();

    let ids: Vec<_> = content.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5"]);
    let starts: Vec<_> = spy
        .calls()
        .iter()
        .map(|c| c.args[3].1.clone())
        .collect();
    assert_eq!(starts, ["0", "2", "4"]);
    assert_eq!(spy.calls()[0].args[1].1, "BrowseDirectChildren");
}

#[test]
fn test_read_dir_stops_on_empty_page() {
    let spy = SpyTransport::replying(vec![browse_page(&["1"], 10), browse_page(&[], 10)]);
    let cds = ContentDirectoryService::new(&spy, "http://server/cds");

    let content = cds.read_dir("0").unwrap();

    assert_eq!(content.items.len(), 1);
    assert_eq!(spy.calls().len(), 2);
}

#[test]
fn test_get_metadata_uses_browse_metadata() {
    let spy = SpyTransport::replying(vec![browse_page(&["7"], 1)]);
    let cds = ContentDirectoryService::new(&spy, "http://server/cds");

    let content = cds.get_metadata("7").unwrap();

    assert_eq!(content.items[0].title, "t7");
    let call = &spy.calls()[0];
    assert_eq!(call.action, "Browse");
    assert_eq!(call.args[1], ("BrowseFlag".to_string(), "BrowseMetadata".to_string()));
}

#[test]
fn test_search_capabilities_set() {
    let spy = SpyTransport::replying(vec![Ok(props(&[(
        "SearchCaps",
        "dc:title, upnp:artist,dc:title,,upnp:class",
    )]))]);
    let cds = ContentDirectoryService::new(&spy, "http://server/cds");

    let caps = cds.get_search_capabilities().unwrap();

    let caps: Vec<_> = caps.iter().map(String::as_str).collect();
    assert_eq!(caps, ["dc:title", "upnp:artist", "upnp:class"]);
}

#[test]
fn test_search_with_broken_result_is_bad_response() {
    let spy = SpyTransport::replying(vec![Ok(props(&[
        ("Result", "<DIDL-Lite><item"),
        ("NumberReturned", "1"),
        ("TotalMatches", "1"),
    ]))]);
    let cds = ContentDirectoryService::new(&spy, "http://server/cds");

    let result = cds.search("0", "dc:title contains \"x\"");

    assert_eq!(status_of(&result), status::BAD_RESPONSE);
}
