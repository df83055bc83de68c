use crate::connection::ConnId;
use crate::line::ascii_lower;
use crate::reply::Reply;
use crate::state::ServerState;

use super::require_arity;

/// `PRIVMSG <target> :<text>`.
pub(super) fn handle(state: &mut ServerState, id: ConnId, params: &[String]) {
    if require_arity(state, id, "PRIVMSG", params, 2) {
        return;
    }
    let target = &params[0];
    let text = &params[1];
    let nick = state.conn(id).unwrap().nick_or_placeholder().to_string();

    if target.starts_with('#') {
        let chan_lower = ascii_lower(target);
        let Some(ch) = state.channel(&chan_lower) else {
            state.reply(
                id,
                Reply::NoSuchChannel {
                    nick,
                    chan: target.clone(),
                },
            );
            return;
        };
        if !ch.is_member(id) {
            state.reply(
                id,
                Reply::NotOnChannel {
                    nick,
                    chan: target.clone(),
                },
            );
            return;
        }
        state.send_to_channel(
            &chan_lower,
            id,
            Some(id),
            "PRIVMSG",
            &format!("{target} :{text}"),
        );
    } else {
        match state.find_by_nick(target) {
            Some(dest) => {
                state.echo_to(dest, id, "PRIVMSG", &format!("{target} :{text}"));
            }
            None => {
                state.reply(
                    id,
                    Reply::NoSuchNick {
                        nick,
                        target: target.clone(),
                    },
                );
            }
        }
    }
}
