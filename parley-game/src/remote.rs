//! Newline-delimited JSON control connection to the external engine
//!
//! One request per line (`{"op": "...", ...}`), one reply per line
//! (`{"ok": true, ...}` or `{"ok": false, "error": "..."}`). The engine
//! process on the other end owns all rule semantics.

use parley_error::{Error, ErrorKind, Result};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{
    tcp::{OwnedReadHalf, OwnedWriteHalf},
    TcpStream,
};

use crate::engine::{Broadcast, GameEngine, PhaseReport};

/// A `GameEngine` over a TCP control connection.
pub struct RemoteEngine {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl RemoteEngine {
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).await.map_err(|e| {
            Error::new(ErrorKind::NetworkFailed, "cannot reach engine control port")
                .with_operation("remote::connect")
                .with_context("addr", addr)
                .set_source(e)
        })?;
        let (read, write) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read),
            writer: write,
        })
    }

    async fn request(&mut self, req: Value) -> Result<Value> {
        let line = format!("{}\n", req);
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| transport_error("control write failed", e))?;
        self.writer.flush().await.ok();

        let mut reply = String::new();
        let n = self
            .reader
            .read_line(&mut reply)
            .await
            .map_err(|e| transport_error("control read failed", e))?;
        if n == 0 {
            return Err(
                Error::engine_failed("control connection closed").with_operation("remote::request")
            );
        }

        serde_json::from_str(reply.trim()).map_err(|e| {
            Error::new(ErrorKind::SerializationFailed, "invalid control reply")
                .with_operation("remote::request")
                .set_source(e)
        })
    }

    /// Run an op that has no payload beyond the ok flag.
    async fn expect_ok(&mut self, op: &'static str) -> Result<Value> {
        let v = self.request(json!({ "op": op })).await?;
        if !reply_ok(&v) {
            return Err(Error::engine_failed(reply_error(&v))
                .with_operation("remote::request")
                .with_context("op", op));
        }
        Ok(v)
    }
}

fn transport_error(message: &'static str, e: std::io::Error) -> Error {
    Error::new(ErrorKind::NetworkFailed, message)
        .with_operation("remote::request")
        .set_source(e)
}

fn reply_ok(v: &Value) -> bool {
    v.get("ok").and_then(Value::as_bool) == Some(true)
}

fn reply_error(v: &Value) -> String {
    v.get("error")
        .and_then(Value::as_str)
        .unwrap_or("engine reported failure")
        .to_string()
}

fn field(v: &Value, key: &'static str) -> Result<Value> {
    v.get(key).cloned().ok_or_else(|| {
        Error::engine_failed(format!("missing '{}' in control reply", key))
            .with_operation("remote::request")
    })
}

impl GameEngine for RemoteEngine {
    async fn state(&mut self) -> Result<Value> {
        let v = self.expect_ok("state").await?;
        field(&v, "state")
    }

    async fn messages(&mut self) -> Result<Value> {
        let v = self.expect_ok("messages").await?;
        field(&v, "messages")
    }

    async fn phase(&mut self) -> Result<String> {
        let v = self.expect_ok("phase").await?;
        field(&v, "phase")?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                Error::engine_failed("phase is not a string").with_operation("remote::request")
            })
    }

    async fn is_done(&mut self) -> Result<bool> {
        let v = self.expect_ok("is_done").await?;
        field(&v, "done")?.as_bool().ok_or_else(|| {
            Error::engine_failed("done is not a boolean").with_operation("remote::request")
        })
    }

    async fn set_orders(&mut self, power: &str, orders: &[String]) -> Result<()> {
        let v = self
            .request(json!({ "op": "set_orders", "power": power, "orders": orders }))
            .await?;
        if !reply_ok(&v) {
            return Err(Error::order_rejected(power, reply_error(&v))
                .with_operation("engine::set_orders"));
        }
        Ok(())
    }

    async fn add_message(&mut self, message: &Broadcast) -> Result<()> {
        let v = self
            .request(json!({ "op": "add_message", "message": message }))
            .await?;
        if !reply_ok(&v) {
            return Err(Error::message_rejected(reply_error(&v))
                .with_operation("engine::add_message")
                .with_context("sender", message.sender.clone()));
        }
        Ok(())
    }

    async fn process(&mut self) -> Result<PhaseReport> {
        let v = self.request(json!({ "op": "process" })).await?;
        if !reply_ok(&v) {
            return Err(Error::engine_failed(reply_error(&v)).with_operation("engine::process"));
        }
        let name = field(&v, "name")?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                Error::engine_failed("phase name is not a string")
                    .with_operation("engine::process")
            })?;
        Ok(PhaseReport { name })
    }

    async fn draw(&mut self) -> Result<()> {
        self.expect_ok("draw").await?;
        Ok(())
    }

    async fn export(&mut self) -> Result<Value> {
        let v = self.expect_ok("export").await?;
        field(&v, "game")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Answer each control line with a canned per-op reply.
    async fn serve_engine(listener: TcpListener) {
        let (stream, _) = listener.accept().await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let req: Value = serde_json::from_str(&line).unwrap();
            let reply = match req["op"].as_str().unwrap() {
                "phase" => json!({"ok": true, "phase": "S1901M"}),
                "is_done" => json!({"ok": true, "done": false}),
                "state" => json!({"ok": true, "state": {"phase": "S1901M"}}),
                "messages" => json!({"ok": true, "messages": {}}),
                "set_orders" => {
                    if req["power"] == "FRANCE" {
                        json!({"ok": true})
                    } else {
                        json!({"ok": false, "error": "unknown power"})
                    }
                }
                "add_message" => json!({"ok": true}),
                "process" => json!({"ok": true, "name": "S1901M"}),
                "export" => json!({"ok": true, "game": {"phases": []}}),
                _ => json!({"ok": false, "error": "unknown op"}),
            };
            write
                .write_all(format!("{}\n", reply).as_bytes())
                .await
                .unwrap();
        }
    }

    async fn connected() -> RemoteEngine {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_engine(listener));
        RemoteEngine::connect(&addr.to_string()).await.unwrap()
    }

    #[tokio::test]
    async fn reads_phase_state_and_done_flag() {
        let mut engine = connected().await;
        assert_eq!(engine.phase().await.unwrap(), "S1901M");
        assert!(!engine.is_done().await.unwrap());
        let state = engine.state().await.unwrap();
        assert_eq!(state["phase"], "S1901M");
    }

    #[tokio::test]
    async fn order_rejection_maps_to_order_rejected() {
        let mut engine = connected().await;
        engine
            .set_orders("FRANCE", &["A PAR H".to_string()])
            .await
            .unwrap();

        let err = engine.set_orders("ITALY", &[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OrderRejected);
        assert!(err.message().contains("unknown power"));
    }

    #[tokio::test]
    async fn process_returns_phase_report() {
        let mut engine = connected().await;
        let report = engine.process().await.unwrap();
        assert_eq!(report.name, "S1901M");
    }

    #[tokio::test]
    async fn broadcast_and_export_round_trip() {
        let mut engine = connected().await;
        engine
            .add_message(&Broadcast::global("FRANCE", "truce?"))
            .await
            .unwrap();
        let game = engine.export().await.unwrap();
        assert!(game["phases"].is_array());
    }
}
