//! Integration tests for the relay client against an in-process WebSocket server.

use futures::SinkExt;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use swarmscan_events::{EventKind, EventSource, EventStream, RelayClient};

/// Spawn a one-connection WebSocket server that sends `frames` then closes.
async fn spawn_relay(frames: Vec<Message>) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();

  tokio::spawn(async move {
    let (socket, _) = listener.accept().await.unwrap();
    let mut ws = accept_async(socket).await.unwrap();
    for frame in frames {
      ws.send(frame).await.unwrap();
    }
    ws.close(None).await.ok();
  });

  format!("ws://{addr}")
}

#[tokio::test]
async fn yields_decoded_envelopes_and_skips_garbage() {
  let url = spawn_relay(vec![
    Message::Text("not json at all".into()),
    Message::Text(r#"{"vuln_type":"SQL_INJECTION","evidence":{"param":"q"}}"#.into()),
    Message::Binary(br#"{"vuln_type":"CRAWL_COMPLETE","evidence":{"sitemap":["https://a"]}}"#.to_vec()),
  ])
  .await;

  let client = RelayClient::new(url.clone());
  assert_eq!(client.url(), url);
  let mut stream = client.connect().await.unwrap();

  let first = stream.next().await.unwrap().unwrap();
  assert_eq!(
    first.vuln_type,
    EventKind::Finding("SQL_INJECTION".to_string())
  );

  let second = stream.next().await.unwrap().unwrap();
  assert_eq!(second.vuln_type, EventKind::CrawlComplete);
  assert_eq!(second.sitemap().unwrap(), vec!["https://a".to_string()]);

  // Peer close ends the sequence.
  assert!(stream.next().await.unwrap().is_none());
}

#[tokio::test]
async fn close_without_frames_yields_none() {
  let url = spawn_relay(vec![]).await;
  let mut stream = RelayClient::new(url).connect().await.unwrap();
  assert!(stream.next().await.unwrap().is_none());
}

#[tokio::test]
async fn connect_fails_when_relay_is_unreachable() {
  // Bind then drop to get a port nothing listens on.
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let result = RelayClient::new(format!("ws://{addr}")).connect().await;
  assert!(result.is_err());
}
