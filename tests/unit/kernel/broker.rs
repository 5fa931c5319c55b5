use super::*;
use serde_json::json;

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
        .block_on(future)
}

fn sent_ids(port: &mut crate::kernel::view::ViewPort) -> Vec<RequestId> {
    port.drain()
        .into_iter()
        .filter_map(|message| message.request_id)
        .collect()
}

#[test]
fn request_ids_start_at_one_and_increase() {
    let broker = MessageBroker::new();
    let (view, mut port) = ViewHandle::channel();

    let _a = broker.request(&view, ViewRequest::GetFileData);
    let _b = broker.request(&view, ViewRequest::GetFileData);
    let _c = broker.request(&view, ViewRequest::GetFileData);

    assert_eq!(sent_ids(&mut port), vec![1, 2, 3]);
    assert_eq!(broker.pending_count(), 3);
}

#[test]
fn ids_are_not_reused_after_resolution() {
    let broker = MessageBroker::new();
    let (view, mut port) = ViewHandle::channel();

    let first = broker.request(&view, ViewRequest::GetFileData);
    assert!(broker.resolve(1, json!({ "data": [] })));
    assert!(block_on(first).is_ok());

    let _second = broker.request(&view, ViewRequest::GetFileData);
    assert_eq!(sent_ids(&mut port), vec![1, 2]);
}

#[test]
fn request_posts_envelope_before_await() {
    let broker = MessageBroker::new();
    let (view, mut port) = ViewHandle::channel();

    let _pending = broker.request(&view, ViewRequest::GetFileData);

    let sent = port.try_recv().expect("request posted synchronously");
    assert_eq!(sent.kind, "getFileData");
    assert_eq!(sent.request_id, Some(1));
    assert_eq!(sent.body, json!({}));
}

#[test]
fn out_of_order_responses_resolve_their_own_requests() {
    let broker = MessageBroker::new();
    let (view, mut port) = ViewHandle::channel();

    let a = broker.request(&view, ViewRequest::GetFileData);
    let b = broker.request(&view, ViewRequest::GetFileData);
    let c = broker.request(&view, ViewRequest::GetFileData);
    let ids = sent_ids(&mut port);

    assert!(broker.resolve(ids[2], json!("C")));
    assert!(broker.resolve(ids[0], json!("A")));
    assert!(broker.resolve(ids[1], json!("B")));

    assert_eq!(block_on(a), Ok(json!("A")));
    assert_eq!(block_on(b), Ok(json!("B")));
    assert_eq!(block_on(c), Ok(json!("C")));
    assert_eq!(broker.pending_count(), 0);
}

#[test]
fn stale_and_duplicate_responses_are_ignored() {
    let broker = MessageBroker::new();
    let (view, _port) = ViewHandle::channel();

    let pending = broker.request(&view, ViewRequest::GetFileData);
    assert!(!broker.resolve(99, json!(null)));
    assert!(broker.resolve(1, json!(1)));
    assert!(!broker.resolve(1, json!(2)));

    assert_eq!(block_on(pending), Ok(json!(1)));
}

#[test]
fn on_incoming_routes_responses_and_passes_events() {
    let broker = MessageBroker::new();
    let (view, _port) = ViewHandle::channel();
    let pending = broker.request(&view, ViewRequest::GetFileData);

    let event = broker.on_incoming(Inbound::Response {
        request_id: 1,
        body: json!({ "data": [9] }),
    });
    assert!(event.is_none());
    assert_eq!(block_on(pending), Ok(json!({ "data": [9] })));

    assert_eq!(
        broker.on_incoming(Inbound::Event(ViewEvent::Ready)),
        Some(ViewEvent::Ready)
    );
    assert_eq!(broker.pending_count(), 0);
}

#[test]
fn view_disposal_rejects_its_pending_requests() {
    let broker = MessageBroker::new();
    let (doomed, _doomed_port) = ViewHandle::channel();
    let (other, _other_port) = ViewHandle::channel();

    let lost = broker.request(&doomed, ViewRequest::GetFileData);
    let kept = broker.request(&other, ViewRequest::GetFileData);
    assert_eq!(broker.pending_for(doomed.id()), 1);

    doomed.dispose();

    assert_eq!(block_on(lost), Err(RequestError::ViewDisposed(doomed.id())));
    assert_eq!(broker.pending_for(doomed.id()), 0);
    assert_eq!(broker.pending_for(other.id()), 1);

    assert!(broker.resolve(2, json!("still here")));
    assert_eq!(block_on(kept), Ok(json!("still here")));
}

#[test]
fn request_to_disposed_view_fails_immediately() {
    let broker = MessageBroker::new();
    let (view, _port) = ViewHandle::channel();
    view.dispose();

    let outcome = block_on(broker.request(&view, ViewRequest::GetFileData));
    assert_eq!(outcome, Err(RequestError::ViewDisposed(view.id())));
    assert_eq!(broker.pending_count(), 0);
}

#[test]
fn request_to_closed_channel_fails_immediately() {
    let broker = MessageBroker::new();
    let (view, port) = ViewHandle::channel();
    drop(port);

    let outcome = block_on(broker.request(&view, ViewRequest::GetFileData));
    assert_eq!(outcome, Err(RequestError::ChannelClosed));
    assert_eq!(broker.pending_count(), 0);
}

#[test]
fn reject_view_reports_count() {
    let broker = MessageBroker::new();
    let (view, _port) = ViewHandle::channel();

    let a = broker.request(&view, ViewRequest::GetFileData);
    let b = broker.request(&view, ViewRequest::GetFileData);
    assert_eq!(broker.reject_view(view.id()), 2);
    assert_eq!(broker.reject_view(view.id()), 0);

    assert!(block_on(a).is_err());
    assert!(block_on(b).is_err());
}

#[test]
fn timeout_rejects_and_clears_entry() {
    let broker = MessageBroker::with_timeout(Some(Duration::from_millis(10)));
    let (view, _port) = ViewHandle::channel();

    let outcome = block_on(broker.request(&view, ViewRequest::GetFileData));
    assert_eq!(
        outcome,
        Err(RequestError::Timeout {
            request_id: 1,
            after: Duration::from_millis(10)
        })
    );
    assert_eq!(broker.pending_count(), 0);
}

#[test]
fn notify_posts_without_request_id() {
    let broker = MessageBroker::new();
    let (view, mut port) = ViewHandle::channel();

    let body = crate::kernel::protocol::InitBody {
        file_size: 1,
        value: vec![7],
        html: None,
    };
    assert!(broker.notify(&view, ViewNotification::Init(body)));

    let sent = port.try_recv().unwrap();
    assert_eq!(sent.kind, "init");
    assert!(sent.request_id.is_none());
    assert_eq!(broker.pending_count(), 0);
}
