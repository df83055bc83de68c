use crate::connection::ConnId;
use crate::reply::Reply;
use crate::state::ServerState;

use super::{require_arity, try_finalize_registration};

/// `PASS <password>`.
pub(super) fn handle(state: &mut ServerState, id: ConnId, params: &[String]) {
    if require_arity(state, id, "PASS", params, 1) {
        return;
    }

    let conn = state.conn(id).unwrap();
    if conn.registered {
        let nick = conn.nick_or_placeholder().to_string();
        state.reply(id, Reply::AlreadyRegistered { nick });
        return;
    }

    if params[0] == state.password {
        state.conn_mut(id).unwrap().password_ok = true;
    } else {
        let nick = state.conn(id).unwrap().nick_or_placeholder().to_string();
        state.reply(id, Reply::PasswdMismatch { nick });
    }

    try_finalize_registration(state, id);
}
