//! HTTP Server Task
//!
//! Minimal HTTP/1.1 server: one connection at a time, one request per
//! connection. Command requests are forwarded to the scheduler through
//! [`link::exchange`] and answered with whatever the scheduler replies.

use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_time::Duration;
use embedded_io_async::Write;
use heapless::String;

use crate::config::{HTTP_PORT, HTTP_SOCKET_TIMEOUT_S, MAX_RESPONSE_BODY, TCP_RX_BUFFER_SIZE, TCP_TX_BUFFER_SIZE};
use crate::net::link;
use crate::protocol::{
    render_error, write_head, ParseError, RequestBuffer, Route, StatusCode, INDEX_HTML, MAX_HEAD_LEN,
};

/// Socket read chunk size
const READ_CHUNK: usize = 256;

/// Accept and serve connections forever
#[embassy_executor::task]
pub async fn http_task(stack: Stack<'static>) -> ! {
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];
    let mut request = RequestBuffer::new();

    log_info!("http server listening on port {}", HTTP_PORT);

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(HTTP_SOCKET_TIMEOUT_S)));

        if socket.accept(HTTP_PORT).await.is_err() {
            log_warn!("accept failed");
            continue;
        }

        request.clear();
        let route = read_request(&mut socket, &mut request).await;
        if let Err(e) = respond(&mut socket, route).await {
            log_debug!("write failed: {}", e);
        }

        socket.close();
        let _ = socket.flush().await;
    }
}

/// Read until a full request is buffered and route it
async fn read_request(socket: &mut TcpSocket<'_>, request: &mut RequestBuffer) -> Result<Route, ParseError> {
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return Err(ParseError::Incomplete),
            Ok(n) => n,
        };
        request.push(&chunk[..n])?;
        match request.route() {
            Err(ParseError::Incomplete) => {}
            other => return other,
        }
    }
}

/// Answer a routed request
async fn respond(
    socket: &mut TcpSocket<'_>,
    route: Result<Route, ParseError>,
) -> Result<(), embassy_net::tcp::Error> {
    let mut head: String<MAX_HEAD_LEN> = String::new();
    let mut body: String<MAX_RESPONSE_BODY> = String::new();

    match route {
        Ok(Route::Index) => {
            write_head(&mut head, StatusCode::Ok, "text/html; charset=utf-8", INDEX_HTML.len());
            socket.write_all(head.as_bytes()).await?;
            socket.write_all(INDEX_HTML.as_bytes()).await?;
            return Ok(());
        }
        Ok(Route::Command(command)) => {
            log_debug!("request: {}", command);
            let response = link::exchange(command).await;
            response.render(&mut body);
            write_head(&mut head, StatusCode::Ok, response.content_type(), body.len());
        }
        Err(error) => {
            log_warn!("rejected request: {}", error);
            render_error(error, &mut body);
            write_head(&mut head, error.status(), "text/plain", body.len());
        }
    }

    socket.write_all(head.as_bytes()).await?;
    socket.write_all(body.as_bytes()).await
}
