use super::*;

#[test]
fn init_serializes_as_notification_envelope() {
    let outbound = ViewNotification::Init(InitBody {
        file_size: 3,
        value: vec![0xde, 0xad, 0x01],
        html: Some("<pre></pre>".to_string()),
    })
    .into_outbound()
    .unwrap();

    let value = serde_json::to_value(&outbound).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "init",
            "body": { "fileSize": 3, "value": [222, 173, 1], "html": "<pre></pre>" }
        })
    );
    assert!(!outbound.is_request());
}

#[test]
fn init_without_html_omits_the_field() {
    let outbound = ViewNotification::Init(InitBody {
        file_size: 10,
        value: vec![1, 2],
        html: None,
    })
    .into_outbound()
    .unwrap();

    assert!(outbound.body.get("html").is_none());
    assert_eq!(outbound.body["fileSize"], 10);
}

#[test]
fn request_envelope_carries_request_id() {
    let outbound = Outbound {
        kind: ViewRequest::GetFileData.kind().to_string(),
        request_id: Some(7),
        body: ViewRequest::GetFileData.body(),
    };

    let value = serde_json::to_value(&outbound).unwrap();
    assert_eq!(
        value,
        json!({ "type": "getFileData", "requestId": 7, "body": {} })
    );
}

#[test]
fn parse_events_by_type() {
    assert_eq!(
        Inbound::parse(json!({ "type": "ready" })).unwrap(),
        Inbound::Event(ViewEvent::Ready)
    );
    assert_eq!(
        Inbound::parse_str(r#"{"type":"open-anyways","body":{}}"#).unwrap(),
        Inbound::Event(ViewEvent::OpenAnyways)
    );
    assert_eq!(
        Inbound::parse(json!({ "type": "edit", "body": { "offset": 4 } })).unwrap(),
        Inbound::Event(ViewEvent::Edit(json!({ "offset": 4 })))
    );
}

#[test]
fn parse_request_id_wins_over_type() {
    let inbound =
        Inbound::parse(json!({ "type": "ready", "requestId": 3, "body": { "data": [1] } }))
            .unwrap();
    assert_eq!(
        inbound,
        Inbound::Response {
            request_id: 3,
            body: json!({ "data": [1] })
        }
    );
}

#[test]
fn parse_response_without_body_defaults_to_null() {
    let inbound = Inbound::parse(json!({ "requestId": 12 })).unwrap();
    assert_eq!(
        inbound,
        Inbound::Response {
            request_id: 12,
            body: Value::Null
        }
    );
}

#[test]
fn parse_rejects_unknown_and_malformed() {
    assert_eq!(
        Inbound::parse(json!({ "type": "scroll" })),
        Err(ProtocolError::UnknownType("scroll".to_string()))
    );
    assert!(matches!(
        Inbound::parse(json!({ "body": {} })),
        Err(ProtocolError::Malformed(_))
    ));
    assert!(matches!(
        Inbound::parse(json!({ "requestId": "seven" })),
        Err(ProtocolError::Malformed(_))
    ));
    assert!(matches!(
        Inbound::parse(json!([1, 2, 3])),
        Err(ProtocolError::Malformed(_))
    ));
    assert!(matches!(
        Inbound::parse_str("not json"),
        Err(ProtocolError::Malformed(_))
    ));
}

#[test]
fn file_data_response_decodes_bytes() {
    let decoded: FileDataResponse =
        serde_json::from_value(json!({ "data": [0, 255, 16] })).unwrap();
    assert_eq!(decoded.data, vec![0, 255, 16]);
}
