//! Communication Protocols
//!
//! HTTP request parsing and handling for the web control panel.
//! Requests are parsed once into a typed [`Command`]; anything that does
//! not parse is rejected with a [`ParseError`] that maps to an HTTP status.
//!
//! | Method | Path      | Command           |
//! |--------|-----------|-------------------|
//! | GET    | `/`       | (index page)      |
//! | POST   | `/send`   | `SendOnce`        |
//! | POST   | `/loop`   | `StartContinuous` |
//! | POST   | `/stop`   | `Stop`            |
//! | POST   | `/timer`  | `ArmTimer`        |
//! | GET    | `/status` | `Status`          |
//!
//! The [`dhcp`] submodule hands out addresses to clients joining the
//! access point.

use core::fmt;
use core::str::FromStr;

use heapless::{String, Vec};

use crate::config::{
    DEFAULT_BIT_WIDTH, DEFAULT_INTERVAL_MS, DEFAULT_PROTOCOL, DEFAULT_TIMER_DELAY_S,
    MAX_REQUEST_SIZE, MAX_RESPONSE_BODY,
};
use crate::types::{ModeKind, TxParams};

pub mod dhcp;

/// Embedded control page
pub const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Capacity of a rendered response head
pub const MAX_HEAD_LEN: usize = 160;

/// Command parsed from an HTTP request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send the code once on the next tick
    SendOnce(TxParams),
    /// Send the code repeatedly
    StartContinuous {
        /// Code and protocol
        params: TxParams,
        /// Minimum spacing between transmissions
        interval_ms: u32,
    },
    /// Cancel any pending mode
    Stop,
    /// Send the code once after a delay
    ArmTimer {
        /// Code and protocol
        params: TxParams,
        /// Delay in seconds
        delay_s: u32,
    },
    /// Report health and mode
    Status,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Command {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::SendOnce(p) => defmt::write!(f, "SendOnce({})", p),
            Self::StartContinuous {
                params,
                interval_ms,
            } => defmt::write!(f, "StartContinuous({}, every {}ms)", params, interval_ms),
            Self::Stop => defmt::write!(f, "Stop"),
            Self::ArmTimer { params, delay_s } => {
                defmt::write!(f, "ArmTimer({}, in {}s)", params, delay_s);
            }
            Self::Status => defmt::write!(f, "Status"),
        }
    }
}

/// Result of routing a request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Serve the control page
    Index,
    /// Forward a command to the scheduler
    Command(Command),
}

/// Request parse failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Request head or body not fully received yet
    Incomplete,
    /// Request line or headers could not be parsed
    Malformed,
    /// Request exceeds the receive buffer
    TooLarge,
    /// Unknown path
    NotFound,
    /// Known path, wrong method
    MethodNotAllowed,
    /// Required form field absent or empty
    MissingField(&'static str),
    /// Form field present but not a valid number
    InvalidNumber(&'static str),
}

impl ParseError {
    /// HTTP status to answer with
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Incomplete | Self::Malformed | Self::MissingField(_) | Self::InvalidNumber(_) => {
                StatusCode::BadRequest
            }
            Self::TooLarge => StatusCode::PayloadTooLarge,
            Self::NotFound => StatusCode::NotFound,
            Self::MethodNotAllowed => StatusCode::MethodNotAllowed,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete => f.write_str("incomplete request"),
            Self::Malformed => f.write_str("malformed request"),
            Self::TooLarge => f.write_str("request too large"),
            Self::NotFound => f.write_str("not found"),
            Self::MethodNotAllowed => f.write_str("method not allowed"),
            Self::MissingField(name) => write!(f, "missing field: {name}"),
            Self::InvalidNumber(name) => write!(f, "invalid number: {name}"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ParseError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Incomplete => defmt::write!(f, "Incomplete"),
            Self::Malformed => defmt::write!(f, "Malformed"),
            Self::TooLarge => defmt::write!(f, "TooLarge"),
            Self::NotFound => defmt::write!(f, "NotFound"),
            Self::MethodNotAllowed => defmt::write!(f, "MethodNotAllowed"),
            Self::MissingField(name) => defmt::write!(f, "MissingField({})", name),
            Self::InvalidNumber(name) => defmt::write!(f, "InvalidNumber({})", name),
        }
    }
}

/// HTTP request method
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// Anything else
    Other,
}

impl Method {
    fn parse(token: &str) -> Self {
        match token {
            "GET" => Self::Get,
            "POST" => Self::Post,
            _ => Self::Other,
        }
    }
}

/// Parsed request line and the headers we care about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestHead<'a> {
    /// Request method
    pub method: Method,
    /// Request target (path plus optional query)
    pub target: &'a str,
    /// Declared body length
    pub content_length: usize,
    /// Length of the head including the terminating blank line
    pub head_len: usize,
}

impl<'a> RequestHead<'a> {
    /// Parse the request head from the start of `buf`
    ///
    /// # Errors
    ///
    /// - `ParseError::Incomplete` - the blank line has not arrived yet
    /// - `ParseError::Malformed` - bad request line or header
    /// - `ParseError::TooLarge` - declared body exceeds the request buffer
    pub fn parse(buf: &'a [u8]) -> Result<Self, ParseError> {
        let end = buf
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .ok_or(ParseError::Incomplete)?;
        let head = core::str::from_utf8(&buf[..end]).map_err(|_| ParseError::Malformed)?;

        let mut lines = head.split("\r\n");
        let request_line = lines.next().ok_or(ParseError::Malformed)?;
        let mut parts = request_line.split(' ');
        let method = Method::parse(parts.next().ok_or(ParseError::Malformed)?);
        let target = parts.next().ok_or(ParseError::Malformed)?;
        let version = parts.next().ok_or(ParseError::Malformed)?;
        if !target.starts_with('/') || !version.starts_with("HTTP/") {
            return Err(ParseError::Malformed);
        }

        let mut content_length = 0;
        for line in lines {
            let (name, value) = line.split_once(':').ok_or(ParseError::Malformed)?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                let declared: u64 = value.trim().parse().map_err(|_| ParseError::Malformed)?;
                content_length = usize::try_from(declared)
                    .ok()
                    .filter(|&len| len <= MAX_REQUEST_SIZE)
                    .ok_or(ParseError::TooLarge)?;
            }
        }

        Ok(Self {
            method,
            target,
            content_length,
            head_len: end + 4,
        })
    }

    /// Total request length in bytes
    #[must_use]
    pub const fn total_len(&self) -> usize {
        self.head_len.saturating_add(self.content_length)
    }

    /// Body slice, if all of it has been received
    #[must_use]
    pub fn body<'b>(&self, buf: &'b [u8]) -> Option<&'b [u8]> {
        buf.get(self.head_len..self.total_len())
    }
}

impl Route {
    /// Map method, target and form body to a route
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `MethodNotAllowed` for unroutable requests and
    /// `MissingField` or `InvalidNumber` for bad command parameters.
    pub fn resolve(method: Method, target: &str, body: &str) -> Result<Self, ParseError> {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let form = Form::new(body, query);

        let expected = match path {
            "/" | "/index.html" | "/status" => Method::Get,
            "/send" | "/loop" | "/stop" | "/timer" => Method::Post,
            _ => return Err(ParseError::NotFound),
        };
        if method != expected {
            return Err(ParseError::MethodNotAllowed);
        }

        let command = match path {
            "/send" => Command::SendOnce(form.params()?),
            "/loop" => Command::StartContinuous {
                params: form.params()?,
                interval_ms: form.number("interval")?.unwrap_or(DEFAULT_INTERVAL_MS),
            },
            "/stop" => Command::Stop,
            "/timer" => Command::ArmTimer {
                params: form.params()?,
                delay_s: form.number("delay")?.unwrap_or(DEFAULT_TIMER_DELAY_S),
            },
            "/status" => Command::Status,
            _ => return Ok(Self::Index),
        };
        Ok(Self::Command(command))
    }
}

/// `application/x-www-form-urlencoded` fields from the body and query
#[derive(Clone, Copy, Debug)]
pub struct Form<'a> {
    body: &'a str,
    query: &'a str,
}

impl<'a> Form<'a> {
    /// Create a form view; body fields take precedence over the query
    #[must_use]
    pub const fn new(body: &'a str, query: &'a str) -> Self {
        Self { body, query }
    }

    /// Raw value of `key`, if present and non-empty
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a str> {
        Self::find(self.body, key).or_else(|| Self::find(self.query, key))
    }

    fn find(fields: &'a str, key: &str) -> Option<&'a str> {
        fields
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Numeric value of `key`, `None` if absent
    ///
    /// # Errors
    ///
    /// `ParseError::InvalidNumber` if the field is present but not a number.
    pub fn number<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ParseError> {
        self.get(key)
            .map(|v| v.parse().map_err(|_| ParseError::InvalidNumber(key)))
            .transpose()
    }

    /// Transmission parameters: `code` required, `protocol` and `bits` defaulted
    ///
    /// # Errors
    ///
    /// `MissingField("code")` without a code, `InvalidNumber` for bad numbers.
    pub fn params(&self) -> Result<TxParams, ParseError> {
        let code = self
            .number("code")?
            .ok_or(ParseError::MissingField("code"))?;
        let protocol = self.number("protocol")?.unwrap_or(DEFAULT_PROTOCOL);
        let bit_width = self.number("bits")?.unwrap_or(DEFAULT_BIT_WIDTH);
        Ok(TxParams::new(code, protocol, bit_width))
    }
}

/// Accumulates a request from socket reads
pub struct RequestBuffer {
    buffer: Vec<u8, MAX_REQUEST_SIZE>,
}

impl RequestBuffer {
    /// Create an empty buffer
    #[must_use]
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Append received bytes
    ///
    /// # Errors
    ///
    /// `ParseError::TooLarge` when the request no longer fits.
    pub fn push(&mut self, data: &[u8]) -> Result<(), ParseError> {
        self.buffer
            .extend_from_slice(data)
            .map_err(|()| ParseError::TooLarge)
    }

    /// Try to route the buffered request
    ///
    /// # Errors
    ///
    /// `ParseError::Incomplete` until head and body are complete, otherwise
    /// any routing error.
    pub fn route(&self) -> Result<Route, ParseError> {
        let head = RequestHead::parse(&self.buffer)?;
        if head.total_len() > MAX_REQUEST_SIZE {
            return Err(ParseError::TooLarge);
        }
        let body = head.body(&self.buffer).ok_or(ParseError::Incomplete)?;
        let body = core::str::from_utf8(body).map_err(|_| ParseError::Malformed)?;
        Route::resolve(head.method, head.target, body)
    }

    /// Buffered bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for RequestBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Health and mode snapshot returned by the status command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusReport {
    /// Armed mode
    pub mode: ModeKind,
    /// Milliseconds since boot
    pub uptime_ms: u32,
    /// Driver invocations since boot
    pub transmissions: u32,
}

#[cfg(feature = "embedded")]
impl defmt::Format for StatusReport {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Status({}, up {}ms, {} tx)",
            self.mode,
            self.uptime_ms,
            self.transmissions
        );
    }
}

/// Scheduler answer to a command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// Command accepted
    Ack,
    /// Status payload
    Status(StatusReport),
}

impl Response {
    /// Content type of the rendered body
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Ack => "text/plain",
            Self::Status(_) => "application/json",
        }
    }

    /// Render the response body
    pub fn render(&self, out: &mut String<MAX_RESPONSE_BODY>) {
        out.clear();
        let _ = match self {
            Self::Ack => out.push_str("ok").map_err(|()| fmt::Error),
            Self::Status(report) => fmt::write(
                out,
                format_args!(
                    "{{\"status\":\"ok\",\"mode\":\"{}\",\"uptime_ms\":{},\"transmissions\":{}}}",
                    report.mode.as_str(),
                    report.uptime_ms,
                    report.transmissions
                ),
            ),
        };
    }
}

/// HTTP status codes the panel answers with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCode {
    /// 200
    Ok,
    /// 400
    BadRequest,
    /// 404
    NotFound,
    /// 405
    MethodNotAllowed,
    /// 413
    PayloadTooLarge,
}

impl StatusCode {
    /// Numeric code
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::PayloadTooLarge => 413,
        }
    }

    /// Reason phrase
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::PayloadTooLarge => "Payload Too Large",
        }
    }
}

/// Format a response head; the connection is always closed afterwards
pub fn write_head(
    out: &mut String<MAX_HEAD_LEN>,
    status: StatusCode,
    content_type: &str,
    content_length: usize,
) {
    out.clear();
    let _ = fmt::write(
        out,
        format_args!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status.code(),
            status.reason(),
            content_type,
            content_length
        ),
    );
}

/// Render an error body
pub fn render_error(error: ParseError, out: &mut String<MAX_RESPONSE_BODY>) {
    out.clear();
    let _ = fmt::write(out, format_args!("{error}"));
}
