//! Per-connection identity, registration flags and byte buffers.
//! Inbound/outbound buffers are plain `Vec<u8>` byte deques with
//! cheap head-consume via `drain`.

use std::os::unix::io::RawFd;

/// Opaque per-connection identifier, a type-safe wrapper around the
/// raw socket descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnId(pub RawFd);

impl ConnId {
    pub fn raw(self) -> RawFd {
        self.0
    }
}

impl std::fmt::Display for ConnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One accepted socket's identity, registration state, and I/O buffers.
/// Created on accept, mutated only by the reactor and the handler
/// invoked on its behalf, destroyed on disconnect.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnId,
    pub inbound: Vec<u8>,
    pub outbound: Vec<u8>,
    pub nick: String,
    pub user: String,
    pub realname: String,
    pub password_ok: bool,
    pub registered: bool,
    /// Tracks whether the reactor should currently poll this handle for
    /// writability too; recomputed at the end of each handling step
    /// from `!outbound.is_empty()`.
    pub wants_write: bool,
}

impl Connection {
    pub fn new(id: ConnId) -> Self {
        Connection {
            id,
            inbound: Vec::new(),
            outbound: Vec::new(),
            nick: String::new(),
            user: String::new(),
            realname: String::new(),
            password_ok: false,
            registered: false,
            wants_write: false,
        }
    }

    /// Appends bytes read from the socket to the inbound buffer.
    pub fn feed(&mut self, data: &[u8]) {
        self.inbound.extend_from_slice(data);
    }

    /// Extracts one `\n`-terminated frame (CRLF-trimmed, `\n` excluded)
    /// from the head of the inbound buffer, if a complete one is
    /// present. Consumes the frame and its terminator from the buffer.
    pub fn take_line(&mut self) -> Option<Vec<u8>> {
        let pos = self.inbound.iter().position(|&b| b == b'\n')?;
        let frame: Vec<u8> = self.inbound.drain(..=pos).collect();
        Some(crate::line::trim_crlf(&frame).to_vec())
    }

    /// Queues `line` (expected to already end in `\r\n`) for sending.
    pub fn send(&mut self, line: &str) {
        self.outbound.extend_from_slice(line.as_bytes());
        self.wants_write = !self.outbound.is_empty();
    }

    /// Source-prefix fields for broadcast echoes: `*`/`user` placeholders
    /// when nick/user are unset.
    pub fn nick_or_placeholder(&self) -> &str {
        if self.nick.is_empty() { "*" } else { &self.nick }
    }

    pub fn user_or_placeholder(&self) -> &str {
        if self.user.is_empty() { "user" } else { &self.user }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_line_extracts_one_frame_at_a_time() {
        let mut c = Connection::new(ConnId(3));
        c.feed(b"NICK alice\r\nUSER a 0 * :Alice\r\n");
        assert_eq!(c.take_line().unwrap(), b"NICK alice");
        assert_eq!(c.take_line().unwrap(), b"USER a 0 * :Alice");
        assert!(c.take_line().is_none());
    }

    #[test]
    fn take_line_waits_for_full_frame() {
        let mut c = Connection::new(ConnId(3));
        c.feed(b"NICK al");
        assert!(c.take_line().is_none());
        c.feed(b"ice\r\n");
        assert_eq!(c.take_line().unwrap(), b"NICK alice");
    }

    #[test]
    fn send_marks_wants_write() {
        let mut c = Connection::new(ConnId(3));
        assert!(!c.wants_write);
        c.send("PING\r\n");
        assert!(c.wants_write);
    }
}
