use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use tracing::{info, warn};

use crate::config::AppConfig;

pub mod api;
pub mod routes;

/// Requests larger than this are truncated.
const MAX_REQUEST_BYTES: usize = 1 << 20;

pub fn run_server(config: &AppConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.bind_addr)?;
    info!(bind_addr = %config.bind_addr, "recruitsim server listening");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, config) {
                    warn!(%err, "request error");
                }
            }
            Err(err) => warn!(%err, "connection failed"),
        }
    }

    Ok(())
}

fn handle_connection(stream: &mut TcpStream, config: &AppConfig) -> std::io::Result<()> {
    let raw = read_request(stream)?;
    if raw.is_empty() {
        return Ok(());
    }

    let (head, body) = split_request(&raw);
    let head = String::from_utf8_lossy(head);
    let body = String::from_utf8_lossy(body);
    let request_line = head.lines().next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET");
    let path = request_parts.next().unwrap_or("/");

    let response = routes::route_request(method, path, &body, config);
    info!(method, path, status = response.status_code, "handled request");
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}

/// Read headers, then keep reading until `Content-Length` bytes of body have arrived.
fn read_request(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut data = Vec::new();
    let mut chunk = [0_u8; 16_384];
    loop {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);
        if data.len() >= MAX_REQUEST_BYTES {
            break;
        }
        if let Some(header_end) = find_header_end(&data) {
            let expected = content_length(&data[..header_end]).unwrap_or(0);
            if data.len() >= header_end + 4 + expected {
                break;
            }
        }
    }
    Ok(data)
}

fn find_header_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|window| window == b"\r\n\r\n")
}

/// Split at the first blank line. Everything after it is body, blank lines included.
fn split_request(raw: &[u8]) -> (&[u8], &[u8]) {
    if let Some(end) = find_header_end(raw) {
        return (&raw[..end], &raw[end + 4..]);
    }
    match raw.windows(2).position(|window| window == b"\n\n") {
        Some(end) => (&raw[..end], &raw[end + 2..]),
        None => (raw, &raw[raw.len()..]),
    }
}

fn content_length(headers: &[u8]) -> Option<usize> {
    String::from_utf8_lossy(headers).lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}
