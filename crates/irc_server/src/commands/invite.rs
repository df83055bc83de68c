use crate::connection::ConnId;
use crate::line::ascii_lower;
use crate::reply::Reply;
use crate::state::ServerState;

use super::{normalize_channel, require_arity};

/// `INVITE <nick> <chan>`.
pub(super) fn handle(state: &mut ServerState, id: ConnId, params: &[String]) {
    if require_arity(state, id, "INVITE", params, 2) {
        return;
    }
    let target_nick = params[0].clone();
    let chan = normalize_channel(&params[1]);
    let chan_lower = ascii_lower(&chan);
    let nick = state.conn(id).unwrap().nick_or_placeholder().to_string();

    let Some(ch) = state.channel(&chan_lower) else {
        state.reply(id, Reply::NoSuchChannel { nick, chan });
        return;
    };
    if !ch.is_operator(id) {
        state.reply(id, Reply::ChanOPrivsNeeded { nick, chan });
        return;
    }

    let Some(target_id) = state.find_by_nick(&target_nick) else {
        state.reply(
            id,
            Reply::NoSuchNick {
                nick,
                target: target_nick,
            },
        );
        return;
    };

    let ch = state.channel(&chan_lower).unwrap();
    if ch.is_member(target_id) {
        state.reply(
            id,
            Reply::UserOnChannel {
                nick,
                user: target_nick,
                chan,
            },
        );
        return;
    }

    state.channel_mut(&chan_lower).unwrap().invite(target_id);
    state.reply(
        id,
        Reply::Inviting {
            nick,
            target: target_nick.clone(),
            chan: chan.clone(),
        },
    );
    state.echo_to(target_id, id, "INVITE", &format!("{target_nick} :{chan}"));
}
