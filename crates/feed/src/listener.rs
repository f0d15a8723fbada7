use crate::events::{parse_line, FeedEvent};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Where newline-delimited JSON batches come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// A Unix stream socket; reconnected whenever it drops.
    Socket(PathBuf),
    /// Standard input; the feed ends at EOF.
    Stdin,
}

/// Spawn a background task that reads the feed and forwards typed
/// [`FeedEvent`]s on the returned channel.
///
/// Every connection is bracketed by `Connected` / `Disconnected`. Socket
/// sources reconnect after `reconnect`; the task stops when the receiver is
/// dropped (or, for stdin, at EOF).
pub fn spawn_listener(source: FeedSource, reconnect: Duration) -> mpsc::Receiver<FeedEvent> {
    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        match source {
            FeedSource::Stdin => {
                info!("Reading feed from stdin");
                let reader = BufReader::new(tokio::io::stdin());
                if pump(reader, &tx).await {
                    let _ = tx.send(FeedEvent::Disconnected).await;
                }
            }
            FeedSource::Socket(path) => loop {
                match UnixStream::connect(&path).await {
                    Ok(stream) => {
                        info!("Connected to feed socket '{}'", path.display());
                        if !pump(BufReader::new(stream), &tx).await {
                            return;
                        }
                        if tx.send(FeedEvent::Disconnected).await.is_err() {
                            return;
                        }
                        warn!("Feed connection lost; reconnecting in {reconnect:?}…");
                    }
                    Err(e) => {
                        error!("Cannot connect to feed socket: {e}; retrying in {reconnect:?}…");
                    }
                }

                tokio::time::sleep(reconnect).await;
            },
        }
    });

    rx
}

/// Forward every line of `reader` as a feed event, preceded by `Connected`.
///
/// Lines are split on raw bytes so a line that is not UTF-8 turns into
/// `Malformed` instead of ending the stream.
///
/// Returns `false` once the receiver is gone, `true` when the stream ended.
async fn pump<R>(reader: R, tx: &mpsc::Sender<FeedEvent>) -> bool
where
    R: AsyncBufRead + Unpin,
{
    if tx.send(FeedEvent::Connected).await.is_err() {
        return false;
    }

    let mut segments = reader.split(b'\n');
    loop {
        match segments.next_segment().await {
            Ok(Some(mut raw)) => {
                if raw.last() == Some(&b'\r') {
                    raw.pop();
                }
                let event = match String::from_utf8(raw) {
                    Ok(line) => parse_line(&line),
                    Err(e) => Some(FeedEvent::Malformed(
                        String::from_utf8_lossy(e.as_bytes()).into_owned(),
                    )),
                };
                let Some(event) = event else {
                    continue;
                };
                if tx.send(event).await.is_err() {
                    return false; // all receivers dropped
                }
            }
            Ok(None) => return true,
            Err(e) => {
                warn!("Feed read error: {e}");
                return true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fillgauge_core::KeyedReading;
    use tokio::io::AsyncWriteExt;
    use tokio::net::UnixListener;

    #[tokio::test]
    async fn pump_brackets_lines_with_connect() {
        let (tx, mut rx) = mpsc::channel(8);
        let input: &[u8] = b"{\"red\": 50}\n\nnot json\n";

        assert!(pump(input, &tx).await);
        drop(tx);

        let mut events = Vec::new();
        while let Some(e) = rx.recv().await {
            events.push(e);
        }
        assert_eq!(
            events,
            vec![
                FeedEvent::Connected,
                FeedEvent::Batch(vec![KeyedReading::new("red", 50.0)]),
                FeedEvent::Malformed("not json".into()),
            ]
        );
    }

    #[tokio::test]
    async fn non_utf8_line_is_malformed_and_reading_continues() {
        let (tx, mut rx) = mpsc::channel(8);
        let input: &[u8] = b"{\"red\": 50}\n\xff\xfe\n{\"red\": 60}\r\n";

        assert!(pump(input, &tx).await);
        drop(tx);

        let mut events = Vec::new();
        while let Some(e) = rx.recv().await {
            events.push(e);
        }
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], FeedEvent::Connected);
        assert_eq!(events[1], FeedEvent::Batch(vec![KeyedReading::new("red", 50.0)]));
        assert!(matches!(events[2], FeedEvent::Malformed(_)));
        assert_eq!(events[3], FeedEvent::Batch(vec![KeyedReading::new("red", 60.0)]));
    }

    async fn next_event(rx: &mut mpsc::Receiver<FeedEvent>) -> FeedEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("feed event within timeout")
            .expect("listener still running")
    }

    async fn serve_line(server: &UnixListener, line: &[u8]) {
        let (mut stream, _) = server.accept().await.unwrap();
        stream.write_all(line).await.unwrap();
        // Dropping the stream closes the connection.
    }

    #[tokio::test]
    async fn socket_connections_are_bracketed_and_reconnected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.sock");
        let server = UnixListener::bind(&path).unwrap();

        let mut rx = spawn_listener(FeedSource::Socket(path), Duration::from_millis(20));

        serve_line(&server, b"{\"red\": 50}\n").await;
        assert_eq!(next_event(&mut rx).await, FeedEvent::Connected);
        assert_eq!(
            next_event(&mut rx).await,
            FeedEvent::Batch(vec![KeyedReading::new("red", 50.0)])
        );
        assert_eq!(next_event(&mut rx).await, FeedEvent::Disconnected);

        serve_line(&server, b"{\"blue\": 60}\n").await;
        assert_eq!(next_event(&mut rx).await, FeedEvent::Connected);
        assert_eq!(
            next_event(&mut rx).await,
            FeedEvent::Batch(vec![KeyedReading::new("blue", 60.0)])
        );
        assert_eq!(next_event(&mut rx).await, FeedEvent::Disconnected);

        // With the receiver gone, the next connection ends the task.
        drop(rx);
        let (stream, _) = server.accept().await.unwrap();
        drop(stream);

        let again = tokio::time::timeout(Duration::from_millis(200), server.accept()).await;
        assert!(again.is_err());
    }

    #[tokio::test]
    async fn pump_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let input: &[u8] = b"{\"red\": 50}\n";
        assert!(!pump(input, &tx).await);
    }
}
