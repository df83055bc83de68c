use crate::connection::ConnId;
use crate::line::{ascii_lower, is_valid_nick};
use crate::reply::Reply;
use crate::state::ServerState;

use super::{require_arity, try_finalize_registration};

/// `NICK <nickname>`. Permitted both pre- and post-registration; nick
/// changes are never broadcast to channels the connection belongs to.
pub(super) fn handle(state: &mut ServerState, id: ConnId, params: &[String]) {
    if require_arity(state, id, "NICK", params, 1) {
        return;
    }
    let new_nick = &params[0];

    if !is_valid_nick(new_nick) {
        state.reply(
            id,
            Reply::NicknameInUse {
                nick: new_nick.clone(),
            },
        );
        return;
    }

    let lower = ascii_lower(new_nick);
    if state.nick_taken(&lower) && state.find_by_nick(new_nick) != Some(id) {
        state.reply(
            id,
            Reply::NicknameInUse {
                nick: new_nick.clone(),
            },
        );
        return;
    }

    state.set_nick(id, new_nick);
    try_finalize_registration(state, id);
}
