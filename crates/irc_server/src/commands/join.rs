use crate::connection::ConnId;
use crate::line::ascii_lower;
use crate::reply::Reply;
use crate::state::ServerState;

use super::{normalize_channel, require_arity};

/// `JOIN <channel> [key]`.
pub(super) fn handle(state: &mut ServerState, id: ConnId, params: &[String]) {
    if require_arity(state, id, "JOIN", params, 1) {
        return;
    }
    let chan = normalize_channel(&params[0]);
    let chan_lower = ascii_lower(&chan);
    let supplied_key = params.get(1).cloned();

    let nick = state.conn(id).unwrap().nick_or_placeholder().to_string();

    state.ensure_channel(&chan);
    let ch = state.channel(&chan_lower).unwrap();

    if ch.invite_only && !ch.is_invited(id) {
        state.reply(id, Reply::InviteOnlyChan { nick, chan });
        return;
    }
    if ch.has_key() && ch.key.as_deref() != supplied_key.as_deref() {
        state.reply(id, Reply::BadChannelKey { nick, chan });
        return;
    }
    if ch.has_limit() && ch.member_count() >= ch.limit.unwrap() {
        state.reply(id, Reply::ChannelIsFull { nick, chan });
        return;
    }

    let was_empty = ch.is_empty();
    let ch = state.channel_mut(&chan_lower).unwrap();
    ch.add_member(id);
    if was_empty {
        ch.grant_operator(id);
    }
    ch.invited.remove(&id);

    state.send_to_channel(&chan_lower, id, None, "JOIN", &format!(":{chan}"));

    let (topic, has_topic) = {
        let ch = state.channel(&chan_lower).unwrap();
        (ch.topic.clone(), !ch.topic.is_empty())
    };
    if has_topic {
        state.reply(
            id,
            Reply::Topic {
                nick: nick.clone(),
                chan: chan.clone(),
                topic,
            },
        );
    } else {
        state.reply(
            id,
            Reply::NoTopic {
                nick: nick.clone(),
                chan: chan.clone(),
            },
        );
    }

    let names = {
        let ch = state.channel(&chan_lower).unwrap();
        ch.members
            .iter()
            .map(|m| {
                let prefix = if ch.is_operator(*m) { "@" } else { "" };
                let member_nick = state
                    .conn(*m)
                    .map(|c| c.nick_or_placeholder().to_string())
                    .unwrap_or_default();
                format!("{prefix}{member_nick}")
            })
            .collect::<Vec<_>>()
            .join(" ")
    };
    state.reply(
        id,
        Reply::NameReply {
            nick: nick.clone(),
            chan: chan.clone(),
            names,
        },
    );
    state.reply(id, Reply::EndOfNames { nick, chan });
}
