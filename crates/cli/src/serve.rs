//! Daemon mode – newline-delimited JSON requests over a Unix socket.
//!
//! Each connection gets its own calculator session for as long as it
//! stays open.

use calc_engine::types::*;
use calc_engine::{CommandRegistry, Session};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

pub async fn run_daemon(socket_path: PathBuf, registry: CommandRegistry) {
    // Remove stale socket if it exists
    let _ = std::fs::remove_file(&socket_path);

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: cannot bind socket {}: {}", socket_path.display(), e);
            std::process::exit(2);
        }
    };

    tracing::info!(socket = %socket_path.display(), "calcctl daemon listening");
    let registry = Arc::new(registry);

    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    let (reader, writer) = stream.into_split();
                    serve_connection(reader, writer, &registry).await;
                    tracing::debug!("connection closed");
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "accept error");
            }
        }
    }
}

async fn serve_connection<R, W>(reader: R, mut writer: W, registry: &CommandRegistry)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session::new();
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let response = handle_request(&line, &mut session, registry);
        let mut resp_json = serde_json::to_string(&response).unwrap_or_else(|_| "{}".into());
        resp_json.push('\n');
        if writer.write_all(resp_json.as_bytes()).await.is_err() {
            break;
        }
    }
}

fn handle_request(line: &str, session: &mut Session, registry: &CommandRegistry) -> DaemonResponse {
    let req: DaemonRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            return DaemonResponse {
                id: "unknown".into(),
                result: None,
                error: Some(ErrorInfo {
                    code: ErrorCode::InvalidInput,
                    message: format!("invalid JSON request: {}", e),
                    details: serde_json::Value::Null,
                }),
            };
        }
    };

    let result = match req.method.as_str() {
        "call" => {
            let cmd_name = req.params.get("cmd").and_then(|v| v.as_str()).unwrap_or("");
            let args = req
                .params
                .get("args")
                .cloned()
                .unwrap_or(serde_json::Value::Object(Default::default()));
            registry.execute(cmd_name, args, session)
        }
        "snapshot" => registry.execute("snapshot", serde_json::Value::Null, session),
        other => {
            return DaemonResponse {
                id: req.id,
                result: None,
                error: Some(ErrorInfo {
                    code: ErrorCode::InvalidInput,
                    message: format!("unknown method: {}", other),
                    details: serde_json::Value::Null,
                }),
            };
        }
    };

    DaemonResponse {
        id: req.id,
        result: Some(result),
        error: None,
    }
}
