use crate::connection::ConnId;
use crate::line::ascii_lower;
use crate::reply::Reply;
use crate::state::ServerState;

use super::{normalize_channel, require_arity};

/// `MODE <chan> [flags [args...]]`.
///
/// Parses `flags` left-to-right; `+`/`-` toggle the current sign
/// (starting `+`). `k`/`l` consume one argument only on `+`; `o` always
/// consumes one argument (a nick). MODE is silent once past the
/// arity/channel/operator checks — no reply is sent for a successful
/// mode change.
pub(super) fn handle(state: &mut ServerState, id: ConnId, params: &[String]) {
    if require_arity(state, id, "MODE", params, 1) {
        return;
    }
    let chan = normalize_channel(&params[0]);
    let chan_lower = ascii_lower(&chan);
    let nick = state.conn(id).unwrap().nick_or_placeholder().to_string();

    if state.channel(&chan_lower).is_none() {
        state.reply(id, Reply::NoSuchChannel { nick, chan });
        return;
    }

    let Some(flagstr) = params.get(1) else {
        // Query form: channel given alone, accepted silently.
        return;
    };

    let is_op = state.channel(&chan_lower).unwrap().is_operator(id);
    if !is_op {
        state.reply(id, Reply::ChanOPrivsNeeded { nick, chan });
        return;
    }

    let mut args = params[2..].iter();
    let mut sign = true;

    for c in flagstr.chars() {
        match c {
            '+' => sign = true,
            '-' => sign = false,
            'i' => {
                state.channel_mut(&chan_lower).unwrap().invite_only = sign;
            }
            't' => {
                state.channel_mut(&chan_lower).unwrap().topic_op_only = sign;
            }
            'k' => {
                if sign {
                    if let Some(key) = args.next() {
                        state.channel_mut(&chan_lower).unwrap().key = Some(key.clone());
                    }
                } else {
                    state.channel_mut(&chan_lower).unwrap().key = None;
                }
            }
            'l' => {
                if sign {
                    if let Some(raw) = args.next() {
                        if let Ok(limit) = raw.parse::<i64>() {
                            if limit > 0 {
                                state.channel_mut(&chan_lower).unwrap().limit = Some(limit as usize);
                            }
                        }
                    }
                } else {
                    state.channel_mut(&chan_lower).unwrap().limit = None;
                }
            }
            'o' => {
                if let Some(target_nick) = args.next() {
                    if let Some(target_id) = state.find_by_nick(target_nick) {
                        let ch = state.channel_mut(&chan_lower).unwrap();
                        if ch.is_member(target_id) {
                            if sign {
                                ch.grant_operator(target_id);
                            } else {
                                ch.revoke_operator(target_id);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
}
