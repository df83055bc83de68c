use crate::connection::ConnId;
use crate::line::{ascii_lower, split_nonempty};
use crate::reply::Reply;
use crate::state::ServerState;

use super::{normalize_channel, require_arity};

/// `PART <chan>[,<chan>...] [:reason]`.
pub(super) fn handle(state: &mut ServerState, id: ConnId, params: &[String]) {
    if require_arity(state, id, "PART", params, 1) {
        return;
    }
    let reason = params.get(1).cloned().unwrap_or_else(|| "Leaving".to_string());
    let nick = state.conn(id).unwrap().nick_or_placeholder().to_string();

    for raw in split_nonempty(&params[0], ',') {
        let chan = normalize_channel(raw);
        let chan_lower = ascii_lower(&chan);

        let Some(ch) = state.channel(&chan_lower) else {
            state.reply(
                id,
                Reply::NoSuchChannel {
                    nick: nick.clone(),
                    chan: chan.clone(),
                },
            );
            continue;
        };
        if !ch.is_member(id) {
            state.reply(
                id,
                Reply::NotOnChannel {
                    nick: nick.clone(),
                    chan: chan.clone(),
                },
            );
            continue;
        }

        state.send_to_channel(&chan_lower, id, None, "PART", &format!("{chan} :{reason}"));
        if let Some(ch) = state.channel_mut(&chan_lower) {
            ch.remove_member(id);
        }
        state.destroy_if_empty(&chan_lower);
    }
}
