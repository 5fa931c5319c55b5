use super::*;
use crate::kernel::protocol::Outbound;
use crate::kernel::view::ViewHandle;
use serde_json::json;
use tokio::io::{duplex, AsyncReadExt};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

#[test]
fn writer_emits_one_json_line_per_message() {
    let output = block_on(async {
        let (view, port) = ViewHandle::channel();
        let (client, mut server) = duplex(4096);

        assert!(view.post(Outbound {
            kind: "init".to_string(),
            request_id: None,
            body: json!({ "fileSize": 1, "value": [7] }),
        }));
        assert!(view.post(Outbound {
            kind: "getFileData".to_string(),
            request_id: Some(1),
            body: json!({}),
        }));
        drop(view);

        writer_loop(port, client).await.unwrap();

        let mut out = String::new();
        server.read_to_string(&mut out).await.unwrap();
        out
    });

    let lines: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(
        lines,
        vec![
            json!({ "type": "init", "body": { "fileSize": 1, "value": [7] } }),
            json!({ "type": "getFileData", "requestId": 1, "body": {} }),
        ]
    );
}

#[test]
fn reader_skips_blank_and_invalid_lines() {
    let seen = block_on(async {
        let (mut client, server) = duplex(4096);
        tokio::io::AsyncWriteExt::write_all(
            &mut client,
            b"{\"type\":\"ready\"}\nnot json\n\n  {\"requestId\":1,\"body\":{\"data\":[]}}",
        )
        .await
        .unwrap();
        drop(client);

        let mut seen = Vec::new();
        reader_loop(server, |value| seen.push(value)).await.unwrap();
        seen
    });

    assert_eq!(
        seen,
        vec![
            json!({ "type": "ready" }),
            json!({ "requestId": 1, "body": { "data": [] } }),
        ]
    );
}
