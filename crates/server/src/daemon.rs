//! Line-delimited JSON over TCP.
//!
//! The transport is deliberately thin: it frames documents and forwards
//! them to the dispatcher. On connect the daemon advertises the operation
//! catalog; afterwards each inbound line is one request and produces
//! exactly one response line.

use crate::dispatch::Dispatcher;
use anyhow::Result;
use geupsik_protocol::OperationRequest;
use serde_json::json;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, WriteHalf};
use tokio::net::{TcpListener, TcpStream};

const BAD_REQUEST: &str = "요청 형식이 올바르지 않습니다.";

/// Accept loop: one spawned task per connection. A failed `accept` (e.g.
/// transient descriptor exhaustion) is logged and the loop continues;
/// existing connections are unaffected.
pub async fn serve(listener: TcpListener, dispatcher: Arc<Dispatcher>) -> Result<()> {
    log::info!("listening on {}", listener.local_addr()?);
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                log::warn!("accept failed: {err}");
                continue;
            }
        };
        log::debug!("connection from {peer}");
        let dispatcher = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            if let Err(err) = serve_one_connection(dispatcher, stream).await {
                log::debug!("connection {peer} ended with error: {err:#}");
            }
        });
    }
}

async fn serve_one_connection(dispatcher: Arc<Dispatcher>, stream: TcpStream) -> Result<()> {
    let (read, mut write) = tokio::io::split(stream);

    send(&mut write, &json!({"type": "tools", "tools": dispatcher.catalog()})).await?;

    let mut lines = BufReader::new(read).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<OperationRequest>(line) {
            Ok(request) => {
                let result = dispatcher.invoke(&request).await;
                json!({"type": "result", "tool": request.tool, "result": result})
            }
            Err(err) => {
                log::debug!("undecodable frame: {err}");
                json!({"type": "error", "error": BAD_REQUEST})
            }
        };
        send(&mut write, &response).await?;
    }
    Ok(())
}

async fn send(write: &mut WriteHalf<TcpStream>, document: &serde_json::Value) -> Result<()> {
    let mut frame = serde_json::to_vec(document)?;
    frame.push(b'\n');
    write.write_all(&frame).await?;
    Ok(())
}
