use crate::connection::ConnId;
use crate::reply::Reply;
use crate::state::ServerState;

use super::{require_arity, try_finalize_registration};

/// `USER <username> <mode> <unused> :<realname>`.
pub(super) fn handle(state: &mut ServerState, id: ConnId, params: &[String]) {
    let conn = state.conn(id).unwrap();
    if conn.registered {
        let nick = conn.nick_or_placeholder().to_string();
        state.reply(id, Reply::AlreadyRegistered { nick });
        return;
    }

    if require_arity(state, id, "USER", params, 4) {
        return;
    }

    let conn = state.conn_mut(id).unwrap();
    conn.user = params[0].clone();
    conn.realname = params[3].clone();

    try_finalize_registration(state, id);
}
