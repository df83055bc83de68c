use crate::connection::ConnId;
use crate::line::ascii_lower;
use crate::reply::Reply;
use crate::state::ServerState;

use super::{normalize_channel, require_arity};

/// `TOPIC <chan> [:<text>]`.
pub(super) fn handle(state: &mut ServerState, id: ConnId, params: &[String]) {
    if require_arity(state, id, "TOPIC", params, 1) {
        return;
    }
    let chan = normalize_channel(&params[0]);
    let chan_lower = ascii_lower(&chan);
    let nick = state.conn(id).unwrap().nick_or_placeholder().to_string();

    let Some(ch) = state.channel(&chan_lower) else {
        state.reply(id, Reply::NoSuchChannel { nick, chan });
        return;
    };

    if params.len() < 2 {
        if ch.topic.is_empty() {
            state.reply(id, Reply::NoTopic { nick, chan });
        } else {
            let topic = ch.topic.clone();
            state.reply(id, Reply::Topic { nick, chan, topic });
        }
        return;
    }

    if ch.topic_op_only && !ch.is_operator(id) {
        state.reply(id, Reply::ChanOPrivsNeeded { nick, chan });
        return;
    }

    let text = params[1].clone();
    state.channel_mut(&chan_lower).unwrap().topic = text.clone();
    state.send_to_channel(&chan_lower, id, None, "TOPIC", &format!("{chan} :{text}"));
}
