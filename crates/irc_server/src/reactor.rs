//! The reactor: one non-blocking `poll()` call multiplexing the
//! listening socket and every client connection, accept/read/write
//! dispatch, and the single disconnection path. A fresh
//! `Vec<libc::pollfd>` is rebuilt from the connection map every
//! iteration rather than mutated in place.

use std::mem;
use std::os::unix::io::RawFd;

use log::{debug, error, trace, warn};

use crate::commands;
use crate::config::Config;
use crate::connection::{ConnId, Connection};
use crate::constants::IO_BUF_LEN;
use crate::error::SetupError;
use crate::parse::parse_line;
use crate::state::ServerState;

pub struct Reactor {
    listen_fd: RawFd,
    state: ServerState,
}

impl Reactor {
    /// Creates and binds the listening socket: IPv4,
    /// `0.0.0.0:<port>`, `SO_REUSEADDR`, backlog 128, non-blocking.
    pub fn new(config: Config) -> Result<Reactor, SetupError> {
        let listen_fd = unsafe {
            let fd = libc::socket(libc::AF_INET, libc::SOCK_STREAM, 0);
            if fd < 0 {
                return Err(SetupError::Socket(std::io::Error::last_os_error()));
            }

            let optval: libc::c_int = 1;
            let rc = libc::setsockopt(
                fd,
                libc::SOL_SOCKET,
                libc::SO_REUSEADDR,
                &optval as *const _ as *const libc::c_void,
                mem::size_of::<libc::c_int>() as libc::socklen_t,
            );
            if rc < 0 {
                let err = std::io::Error::last_os_error();
                libc::close(fd);
                return Err(SetupError::SetOpt(err));
            }

            let addr = libc::sockaddr_in {
                sin_family: libc::AF_INET as libc::sa_family_t,
                sin_port: config.port.to_be(),
                sin_addr: libc::in_addr { s_addr: 0 },
                sin_zero: [0; 8],
            };
            let rc = libc::bind(
                fd,
                &addr as *const libc::sockaddr_in as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
            );
            if rc < 0 {
                let err = std::io::Error::last_os_error();
                libc::close(fd);
                return Err(SetupError::Bind(err));
            }

            if libc::listen(fd, 128) < 0 {
                let err = std::io::Error::last_os_error();
                libc::close(fd);
                return Err(SetupError::Listen(err));
            }

            if let Err(e) = set_nonblocking(fd) {
                libc::close(fd);
                return Err(e);
            }

            fd
        };

        Ok(Reactor {
            listen_fd,
            state: ServerState::new(config.server_name, config.password),
        })
    }

    /// Runs the reactor loop until `poll` reports a non-recoverable
    /// error.
    pub fn run(&mut self) {
        loop {
            let mut pollfds: Vec<libc::pollfd> = Vec::with_capacity(self.state.connections.len() + 1);
            pollfds.push(libc::pollfd {
                fd: self.listen_fd,
                events: libc::POLLIN,
                revents: 0,
            });
            for conn in self.state.connections.values() {
                let mut events = libc::POLLIN;
                if conn.wants_write {
                    events |= libc::POLLOUT;
                }
                pollfds.push(libc::pollfd {
                    fd: conn.id.raw(),
                    events,
                    revents: 0,
                });
            }

            let n = unsafe { libc::poll(pollfds.as_mut_ptr(), pollfds.len() as libc::nfds_t, -1) };
            if n < 0 {
                let err = std::io::Error::last_os_error();
                if err.kind() == std::io::ErrorKind::Interrupted {
                    continue;
                }
                error!("poll failed: {err}");
                break;
            }

            for pfd in &pollfds {
                if pfd.revents == 0 {
                    continue;
                }
                if pfd.fd == self.listen_fd {
                    self.accept_loop();
                    continue;
                }

                let id = ConnId(pfd.fd);
                if self.state.conn(id).is_none() {
                    // Already disconnected earlier in this same iteration.
                    continue;
                }
                if pfd.revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0 {
                    self.read_connection(id);
                }
                if self.state.conn(id).is_some() && pfd.revents & libc::POLLOUT != 0 {
                    self.write_connection(id);
                }
            }
        }
    }

    /// Accepts repeatedly until `accept` would block.
    fn accept_loop(&mut self) {
        loop {
            let fd = unsafe { libc::accept(self.listen_fd, std::ptr::null_mut(), std::ptr::null_mut()) };
            if fd < 0 {
                break;
            }
            if let Err(e) = set_nonblocking(fd) {
                warn!("failed to set accepted socket non-blocking: {e}");
                unsafe { libc::close(fd) };
                continue;
            }
            let id = ConnId(fd);
            self.state.insert_connection(Connection::new(id));
            debug!("accepted connection {id}");
        }
    }

    /// Reads until `recv` would block, then extracts and dispatches every
    /// complete line.
    fn read_connection(&mut self, id: ConnId) {
        let mut buf = [0u8; IO_BUF_LEN];
        loop {
            let n = unsafe {
                libc::recv(id.raw(), buf.as_mut_ptr() as *mut libc::c_void, buf.len(), 0)
            };
            if n > 0 {
                if let Some(conn) = self.state.conn_mut(id) {
                    conn.feed(&buf[..n as usize]);
                }
            } else if n == 0 {
                trace!("connection {id} closed by peer");
                self.disconnect(id, "Client quit");
                return;
            } else {
                break;
            }
        }
        self.drain_lines(id);
    }

    fn drain_lines(&mut self, id: ConnId) {
        loop {
            let bytes = match self.state.conn_mut(id) {
                Some(conn) => conn.take_line(),
                None => return,
            };
            let Some(bytes) = bytes else { break };
            if bytes.is_empty() {
                continue;
            }
            let text = String::from_utf8_lossy(&bytes).into_owned();
            let parsed = parse_line(&text);
            if parsed.command.is_empty() {
                continue;
            }
            trace!("{id} -> {} {:?}", parsed.command, parsed.params);
            commands::dispatch(&mut self.state, id, &parsed.command, &parsed.params);

            if self.state.conn(id).is_none() {
                // The handler (QUIT) disconnected this connection;
                // the OS handle still needs closing.
                self.close_fd(id);
                return;
            }
        }
    }

    /// Issues one `send` of the whole outbound buffer.
    fn write_connection(&mut self, id: ConnId) {
        let Some(conn) = self.state.conn_mut(id) else { return };
        if conn.outbound.is_empty() {
            conn.wants_write = false;
            return;
        }
        let n = unsafe {
            libc::send(
                id.raw(),
                conn.outbound.as_ptr() as *const libc::c_void,
                conn.outbound.len(),
                0,
            )
        };
        if n > 0 {
            conn.outbound.drain(..n as usize);
        }
        conn.wants_write = !conn.outbound.is_empty();
    }

    /// The single disconnection path: reconciles server state, then
    /// closes the OS handle exactly once.
    fn disconnect(&mut self, id: ConnId, reason: &str) {
        self.state.disconnect(id, reason);
        self.close_fd(id);
    }

    fn close_fd(&self, id: ConnId) {
        unsafe {
            libc::close(id.raw());
        }
    }
}

fn set_nonblocking(fd: RawFd) -> Result<(), SetupError> {
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL, 0);
        if flags < 0 {
            return Err(SetupError::NonBlocking(std::io::Error::last_os_error()));
        }
        if libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
            return Err(SetupError::NonBlocking(std::io::Error::last_os_error()));
        }
    }
    Ok(())
}

impl Drop for Reactor {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.listen_fd);
        }
    }
}
