use super::{ChannelEvent, Outbound, deliver};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info};

pub(super) async fn run(
    url: String,
    open: Arc<AtomicBool>,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<ChannelEvent>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(e) => {
            error!("Failed to connect to signaling server {}: {}", url, e);
            let _ = events.send(ChannelEvent::Error(e.to_string()));
            let _ = events.send(ChannelEvent::Closed);
            return;
        }
    };

    info!("Signaling socket connected: {}", url);
    let (mut sink, mut source) = stream.split();

    open.store(true, Ordering::SeqCst);
    let _ = events.send(ChannelEvent::Open);

    let failure = loop {
        tokio::select! {
            out = outbound.recv() => match out {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = sink.send(Message::text(text)).await {
                        break Some(e.to_string());
                    }
                }
                Some(Outbound::Close) | None => {
                    debug!("Closing signaling socket");
                    let _ = sink.send(Message::Close(None)).await;
                    break None;
                }
            },

            msg = source.next() => match msg {
                Some(Ok(Message::Text(text))) => deliver(&events, text.as_str()),
                Some(Ok(Message::Close(_))) | None => break None,
                Some(Ok(_)) => {}
                Some(Err(e)) => break Some(e.to_string()),
            },
        }
    };

    open.store(false, Ordering::SeqCst);

    if let Some(reason) = failure {
        error!("Signaling socket error: {}", reason);
        let _ = events.send(ChannelEvent::Error(reason));
    }

    info!("Signaling socket closed: {}", url);
    let _ = events.send(ChannelEvent::Closed);
}
