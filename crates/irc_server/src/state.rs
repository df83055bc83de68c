//! Server state, minus the reactor loop itself: the connection map, the
//! channel index, and the nickname index, plus the mutating operations
//! every command handler needs (reply, fan-out, disconnect). One struct
//! owns every index; all mutation goes through its methods.

use std::collections::HashMap;

use crate::channel::Channel;
use crate::connection::{ConnId, Connection};
use crate::line::ascii_lower;
use crate::reply::{format_echo, Reply};

pub struct ServerState {
    pub server_name: String,
    pub password: String,
    pub connections: HashMap<ConnId, Connection>,
    /// Keyed by lowercased channel name; `Channel::name` keeps original casing.
    pub channels: HashMap<String, Channel>,
    /// Keyed by lowercased nick.
    pub nick_index: HashMap<String, ConnId>,
}

impl ServerState {
    pub fn new(server_name: String, password: String) -> Self {
        ServerState {
            server_name,
            password,
            connections: HashMap::new(),
            channels: HashMap::new(),
            nick_index: HashMap::new(),
        }
    }

    pub fn conn(&self, id: ConnId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn conn_mut(&mut self, id: ConnId) -> Option<&mut Connection> {
        self.connections.get_mut(&id)
    }

    pub fn insert_connection(&mut self, conn: Connection) {
        self.connections.insert(conn.id, conn);
    }

    pub fn nick_taken(&self, lower_nick: &str) -> bool {
        self.nick_index.contains_key(lower_nick)
    }

    pub fn find_by_nick(&self, nick: &str) -> Option<ConnId> {
        self.nick_index.get(&ascii_lower(nick)).copied()
    }

    /// Installs `nick` for `id` in the nick index, first removing any
    /// previous mapping for this connection's old nick (if it had one).
    pub fn set_nick(&mut self, id: ConnId, nick: &str) {
        if let Some(conn) = self.connections.get(&id) {
            if !conn.nick.is_empty() {
                self.nick_index.remove(&ascii_lower(&conn.nick));
            }
        }
        self.nick_index.insert(ascii_lower(nick), id);
        if let Some(conn) = self.connections.get_mut(&id) {
            conn.nick = nick.to_string();
        }
    }

    /// Enqueues a formatted numeric reply for `id`. No-op if the
    /// connection is already gone.
    pub fn reply(&mut self, id: ConnId, reply: Reply) {
        let server_name = self.server_name.clone();
        if let Some(conn) = self.connections.get_mut(&id) {
            conn.send(&reply.format(&server_name));
        }
    }

    /// Sends a raw pre-formatted line (expected to end in `\r\n`) to one
    /// connection. No-op if the connection is already gone.
    pub fn send_line(&mut self, id: ConnId, line: &str) {
        if let Some(conn) = self.connections.get_mut(&id) {
            conn.send(line);
        }
    }

    /// Formats and sends a source-prefixed command echo to one connection.
    pub fn echo_to(&mut self, id: ConnId, from: ConnId, command: &str, args: &str) {
        let (nick, user, server_name) = match self.connections.get(&from) {
            Some(c) => (
                c.nick_or_placeholder().to_string(),
                c.user_or_placeholder().to_string(),
                self.server_name.clone(),
            ),
            None => return,
        };
        let line = format_echo(&nick, &user, &server_name, command, args);
        self.send_line(id, &line);
    }

    /// Enqueues `command args` (source-prefixed by `from`) onto every
    /// member of `chan_lower` except `except`, if given. Members whose
    /// handle no longer resolves are skipped defensively.
    pub fn send_to_channel(
        &mut self,
        chan_lower: &str,
        from: ConnId,
        except: Option<ConnId>,
        command: &str,
        args: &str,
    ) {
        let members: Vec<ConnId> = match self.channels.get(chan_lower) {
            Some(ch) => ch.members.iter().copied().collect(),
            None => return,
        };
        for member in members {
            if Some(member) == except {
                continue;
            }
            self.echo_to(member, from, command, args);
        }
    }

    pub fn channel(&self, chan_lower: &str) -> Option<&Channel> {
        self.channels.get(chan_lower)
    }

    pub fn channel_mut(&mut self, chan_lower: &str) -> Option<&mut Channel> {
        self.channels.get_mut(chan_lower)
    }

    /// Returns the existing channel or creates an empty one, preserving
    /// the casing of `name` as first seen.
    pub fn ensure_channel(&mut self, name: &str) -> &mut Channel {
        let key = ascii_lower(name);
        self.channels
            .entry(key)
            .or_insert_with(|| Channel::new(name.to_string()))
    }

    /// Removes `chan_lower` from the index if its member set is empty.
    pub fn destroy_if_empty(&mut self, chan_lower: &str) {
        if self.channels.get(chan_lower).is_some_and(Channel::is_empty) {
            self.channels.remove(chan_lower);
        }
    }

    /// Names every channel `id` belongs to, lowercased keys.
    pub fn channels_of(&self, id: ConnId) -> Vec<String> {
        self.channels
            .iter()
            .filter(|(_, ch)| ch.is_member(id))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// The single disconnection routine. Broadcasts a QUIT
    /// echo to every channel the connection belongs to, removes it from
    /// those channels (destroying any that become empty), then drops it
    /// from the nick index and the connection map. The caller is
    /// responsible for closing the OS handle and removing it from the
    /// reactor's readiness table.
    pub fn disconnect(&mut self, id: ConnId, reason: &str) {
        let chans = self.channels_of(id);
        for chan_lower in &chans {
            self.send_to_channel(chan_lower, id, Some(id), "QUIT", &format!(":{reason}"));
        }
        for chan_lower in &chans {
            if let Some(ch) = self.channels.get_mut(chan_lower) {
                ch.remove_member(id);
            }
            self.destroy_if_empty(chan_lower);
        }

        if let Some(conn) = self.connections.get(&id) {
            if !conn.nick.is_empty() {
                self.nick_index.remove(&ascii_lower(&conn.nick));
            }
        }
        self.connections.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> ServerState {
        ServerState::new("ft_irc.min".into(), "pw".into())
    }

    #[test]
    fn set_nick_updates_index_and_removes_old_mapping() {
        let mut s = fresh();
        s.insert_connection(Connection::new(ConnId(1)));
        s.set_nick(ConnId(1), "alice");
        assert_eq!(s.find_by_nick("alice"), Some(ConnId(1)));
        s.set_nick(ConnId(1), "alice2");
        assert_eq!(s.find_by_nick("alice"), None);
        assert_eq!(s.find_by_nick("alice2"), Some(ConnId(1)));
    }

    #[test]
    fn disconnect_clears_indexes_and_empty_channel() {
        let mut s = fresh();
        s.insert_connection(Connection::new(ConnId(1)));
        s.set_nick(ConnId(1), "alice");
        s.ensure_channel("#c").add_member(ConnId(1));

        s.disconnect(ConnId(1), "Client quit");

        assert!(s.find_by_nick("alice").is_none());
        assert!(s.conn(ConnId(1)).is_none());
        assert!(s.channel("#c").is_none());
    }

    #[test]
    fn channel_survives_disconnect_if_other_members_remain() {
        let mut s = fresh();
        s.insert_connection(Connection::new(ConnId(1)));
        s.insert_connection(Connection::new(ConnId(2)));
        s.set_nick(ConnId(1), "alice");
        s.set_nick(ConnId(2), "bob");
        s.ensure_channel("#c").add_member(ConnId(1));
        s.ensure_channel("#c").add_member(ConnId(2));

        s.disconnect(ConnId(1), "bye");

        assert!(s.channel("#c").is_some());
        assert!(!s.channel("#c").unwrap().is_member(ConnId(1)));
        assert!(s.channel("#c").unwrap().is_member(ConnId(2)));
    }
}
