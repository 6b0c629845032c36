//! Socket round-trip against a live listener on an ephemeral port.

use async_trait::async_trait;
use chrono::NaiveDate;
use geupsik_neis::{ApiError, NeisApi, RawMealRow, RawSchoolRow, SchoolQuery};
use geupsik_protocol::SchoolRef;
use geupsik_server::{build_dispatcher, daemon};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

struct EmptyApi;

#[async_trait]
impl NeisApi for EmptyApi {
    async fn meal_row(
        &self,
        _school: &SchoolRef,
        _date: &str,
    ) -> Result<Option<RawMealRow>, ApiError> {
        Ok(None)
    }

    async fn school_rows(&self, _query: &SchoolQuery) -> Result<Vec<RawSchoolRow>, ApiError> {
        Ok(Vec::new())
    }
}

async fn start_daemon() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let dispatcher = Arc::new(build_dispatcher(Arc::new(EmptyApi), || {
        NaiveDate::from_ymd_opt(2024, 4, 4).unwrap()
    }));
    tokio::spawn(async move {
        let _ = daemon::serve(listener, dispatcher).await;
    });
    addr
}

#[tokio::test]
async fn connect_advertises_the_catalog_then_serves_requests() {
    let addr = start_daemon().await;
    let stream = TcpStream::connect(addr).await.unwrap();
    let (read, mut write) = tokio::io::split(stream);
    let mut lines = BufReader::new(read).lines();

    let greeting: Value =
        serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(greeting["type"], "tools");
    let tools = greeting["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 6);
    assert_eq!(tools[0]["name"], "searchSchools");

    write
        .write_all(b"{\"tool\": \"getOfficeList\"}\n")
        .await
        .unwrap();
    let response: Value =
        serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(response["type"], "result");
    assert_eq!(response["tool"], "getOfficeList");
    assert_eq!(response["result"]["ok"], true);
    assert_eq!(response["result"]["payload"].as_array().unwrap().len(), 16);
}

#[tokio::test]
async fn undecodable_frame_yields_an_error_message() {
    let addr = start_daemon().await;
    let stream = TcpStream::connect(addr).await.unwrap();
    let (read, mut write) = tokio::io::split(stream);
    let mut lines = BufReader::new(read).lines();
    lines.next_line().await.unwrap();

    write.write_all(b"not json\n").await.unwrap();
    let response: Value =
        serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(response["type"], "error");
    assert_eq!(response["error"], "요청 형식이 올바르지 않습니다.");
}

#[tokio::test]
async fn daemon_keeps_serving_after_a_connection_dies_mid_request() {
    let addr = start_daemon().await;

    {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (_read, mut write) = tokio::io::split(stream);
        // Half a frame, then drop the connection without reading anything.
        write.write_all(b"{\"tool\": \"getOff").await.unwrap();
    }

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read, mut write) = tokio::io::split(stream);
    let mut lines = BufReader::new(read).lines();
    lines.next_line().await.unwrap();

    write
        .write_all(b"{\"tool\": \"getSchoolTypes\"}\n")
        .await
        .unwrap();
    let response: Value =
        serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(response["result"]["ok"], true);
    assert_eq!(response["result"]["payload"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_operation_travels_back_in_the_envelope() {
    let addr = start_daemon().await;
    let stream = TcpStream::connect(addr).await.unwrap();
    let (read, mut write) = tokio::io::split(stream);
    let mut lines = BufReader::new(read).lines();
    lines.next_line().await.unwrap();

    write
        .write_all(b"{\"tool\": \"getMeal\", \"parameters\": {}}\n")
        .await
        .unwrap();
    let response: Value =
        serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(response["result"]["ok"], false);
    assert_eq!(response["result"]["errorMessage"], "알 수 없는 도구입니다.");
}
