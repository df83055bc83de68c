use crate::connection::ConnId;
use crate::line::ascii_lower;
use crate::reply::Reply;
use crate::state::ServerState;

use super::{normalize_channel, require_arity};

/// `KICK <chan> <nick> [:reason]`.
pub(super) fn handle(state: &mut ServerState, id: ConnId, params: &[String]) {
    if require_arity(state, id, "KICK", params, 2) {
        return;
    }
    let chan = normalize_channel(&params[0]);
    let chan_lower = ascii_lower(&chan);
    let target_nick = params[1].clone();
    let reason = params.get(2).cloned().unwrap_or_else(|| "Kicked".to_string());
    let nick = state.conn(id).unwrap().nick_or_placeholder().to_string();

    let Some(ch) = state.channel(&chan_lower) else {
        state.reply(id, Reply::NoSuchChannel { nick, chan });
        return;
    };
    if !ch.is_operator(id) {
        state.reply(id, Reply::ChanOPrivsNeeded { nick, chan });
        return;
    }

    let target_id = state.find_by_nick(&target_nick);
    let target_is_member = target_id
        .map(|t| state.channel(&chan_lower).unwrap().is_member(t))
        .unwrap_or(false);
    if !target_is_member {
        state.reply(
            id,
            Reply::NoSuchNick {
                nick,
                target: target_nick,
            },
        );
        return;
    }
    let target_id = target_id.unwrap();

    state.send_to_channel(
        &chan_lower,
        id,
        None,
        "KICK",
        &format!("{chan} {target_nick} :{reason}"),
    );
    state.channel_mut(&chan_lower).unwrap().remove_member(target_id);
    state.destroy_if_empty(&chan_lower);
}
