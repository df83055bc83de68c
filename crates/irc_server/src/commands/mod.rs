//! One handler per recognized command, consuming parsed params and
//! mutating server state.

mod invite;
mod join;
mod kick;
mod mode;
mod nick;
mod part;
mod pass;
mod ping;
mod privmsg;
mod quit;
mod topic;
mod user;

use crate::connection::ConnId;
use crate::reply::Reply;
use crate::state::ServerState;

/// Routes one already-parsed line to its handler. Applies the two
/// cross-cutting preconditions: the handle must resolve to a live
/// connection, and (except for PASS/NICK/USER/PING/QUIT) the connection
/// must already be registered.
pub fn dispatch(state: &mut ServerState, id: ConnId, command: &str, params: &[String]) {
    if state.conn(id).is_none() {
        return;
    }

    let cmd = command.to_ascii_uppercase();
    let needs_registration = !matches!(cmd.as_str(), "PASS" | "NICK" | "USER" | "PING" | "QUIT");
    if needs_registration {
        let registered = state.conn(id).map(|c| c.registered).unwrap_or(false);
        if !registered {
            return;
        }
    }

    match cmd.as_str() {
        "PASS" => pass::handle(state, id, params),
        "NICK" => nick::handle(state, id, params),
        "USER" => user::handle(state, id, params),
        "JOIN" => join::handle(state, id, params),
        "PART" => part::handle(state, id, params),
        "PRIVMSG" => privmsg::handle(state, id, params),
        "MODE" => mode::handle(state, id, params),
        "TOPIC" => topic::handle(state, id, params),
        "INVITE" => invite::handle(state, id, params),
        "KICK" => kick::handle(state, id, params),
        "PING" => ping::handle(state, id, params),
        "QUIT" => quit::handle(state, id, params),
        _ => {}
    }
}

/// Sends 461 and returns `true` when `params` is shorter than `min`.
fn require_arity(state: &mut ServerState, id: ConnId, cmd: &str, params: &[String], min: usize) -> bool {
    if params.len() < min {
        let nick = state
            .conn(id)
            .map(|c| c.nick_or_placeholder().to_string())
            .unwrap_or_default();
        state.reply(
            id,
            Reply::NeedMoreParams {
                nick,
                cmd: cmd.to_string(),
            },
        );
        true
    } else {
        false
    }
}

/// Prefixes `#` onto a bare channel name unless it already starts with one.
fn normalize_channel(name: &str) -> String {
    if name.starts_with('#') {
        name.to_string()
    } else {
        format!("#{name}")
    }
}

/// Registration finalization: once password, nick and user are all
/// set, flip `registered` and send the 001 welcome.
fn try_finalize_registration(state: &mut ServerState, id: ConnId) {
    let ready = match state.conn(id) {
        Some(c) => !c.registered && c.password_ok && !c.nick.is_empty() && !c.user.is_empty(),
        None => false,
    };
    if !ready {
        return;
    }
    if let Some(c) = state.conn_mut(id) {
        c.registered = true;
    }
    let nick = state.conn(id).unwrap().nick.clone();
    state.reply(id, Reply::Welcome { nick });
}
