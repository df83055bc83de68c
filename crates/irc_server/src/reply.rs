//! Wire strings for numeric replies and broadcast command echoes.

/// One of the numeric replies this server ever sends. `nick` is the
/// recipient's current nickname, or `"*"` before one has been chosen
/// (only reachable for 433).
#[derive(Debug, Clone)]
pub enum Reply {
    Welcome { nick: String },
    NoTopic { nick: String, chan: String },
    Topic { nick: String, chan: String, topic: String },
    Inviting { nick: String, target: String, chan: String },
    NameReply { nick: String, chan: String, names: String },
    EndOfNames { nick: String, chan: String },
    NoSuchNick { nick: String, target: String },
    NoSuchChannel { nick: String, chan: String },
    NicknameInUse { nick: String },
    NotOnChannel { nick: String, chan: String },
    UserOnChannel { nick: String, user: String, chan: String },
    NeedMoreParams { nick: String, cmd: String },
    AlreadyRegistered { nick: String },
    PasswdMismatch { nick: String },
    ChannelIsFull { nick: String, chan: String },
    InviteOnlyChan { nick: String, chan: String },
    BadChannelKey { nick: String, chan: String },
    ChanOPrivsNeeded { nick: String, chan: String },
}

impl Reply {
    fn numeric(&self) -> u16 {
        match self {
            Reply::Welcome { .. } => 1,
            Reply::NoTopic { .. } => 331,
            Reply::Topic { .. } => 332,
            Reply::Inviting { .. } => 341,
            Reply::NameReply { .. } => 353,
            Reply::EndOfNames { .. } => 366,
            Reply::NoSuchNick { .. } => 401,
            Reply::NoSuchChannel { .. } => 403,
            Reply::NicknameInUse { .. } => 433,
            Reply::NotOnChannel { .. } => 442,
            Reply::UserOnChannel { .. } => 443,
            Reply::NeedMoreParams { .. } => 461,
            Reply::AlreadyRegistered { .. } => 462,
            Reply::PasswdMismatch { .. } => 464,
            Reply::ChannelIsFull { .. } => 471,
            Reply::InviteOnlyChan { .. } => 473,
            Reply::BadChannelKey { .. } => 475,
            Reply::ChanOPrivsNeeded { .. } => 482,
        }
    }

    /// Renders the full `:<server> <code> ...\r\n` line.
    pub fn format(&self, server_name: &str) -> String {
        let code = self.numeric();
        let body = match self {
            Reply::Welcome { nick } => format!("{nick} :Welcome to ft_irc, {nick}"),
            Reply::NoTopic { nick, chan } => format!("{nick} {chan} :No topic is set"),
            Reply::Topic { nick, chan, topic } => format!("{nick} {chan} :{topic}"),
            Reply::Inviting { nick, target, chan } => format!("{nick} {target} {chan}"),
            Reply::NameReply { nick, chan, names } => format!("{nick} = {chan} :{names}"),
            Reply::EndOfNames { nick, chan } => format!("{nick} {chan} :End of /NAMES list."),
            Reply::NoSuchNick { nick, target } => format!("{nick} {target} :No such nick"),
            Reply::NoSuchChannel { nick, chan } => format!("{nick} {chan} :No such channel"),
            Reply::NicknameInUse { nick } => format!("* {nick} :Nickname is already in use"),
            Reply::NotOnChannel { nick, chan } => {
                format!("{nick} {chan} :You're not on that channel")
            }
            Reply::UserOnChannel { nick, user, chan } => {
                format!("{nick} {user} {chan} :is already on channel")
            }
            Reply::NeedMoreParams { nick, cmd } => format!("{nick} {cmd} :Not enough parameters"),
            Reply::AlreadyRegistered { nick } => format!("{nick} :You may not reregister"),
            Reply::PasswdMismatch { nick } => format!("{nick} :Password incorrect"),
            Reply::ChannelIsFull { nick, chan } => {
                format!("{nick} {chan} :Cannot join channel (+l)")
            }
            Reply::InviteOnlyChan { nick, chan } => {
                format!("{nick} {chan} :Cannot join channel (+i)")
            }
            Reply::BadChannelKey { nick, chan } => {
                format!("{nick} {chan} :Cannot join channel (+k)")
            }
            Reply::ChanOPrivsNeeded { nick, chan } => {
                format!("{nick} {chan} :You're not channel operator")
            }
        };
        format!(":{server_name} {code:03} {body}\r\n")
    }
}

/// Source-prefixed command echo, used for JOIN/PART/PRIVMSG/TOPIC/KICK/
/// INVITE/QUIT broadcasts: `:<nick>!<user>@<server> <CMD> <args...>\r\n`.
/// `nick`/`user` fall back to `*`/`user` placeholders when unset.
pub fn format_echo(nick: &str, user: &str, server_name: &str, command: &str, args: &str) -> String {
    let nick = if nick.is_empty() { "*" } else { nick };
    let user = if user.is_empty() { "user" } else { user };
    format!(":{nick}!{user}@{server_name} {command} {args}\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_matches_spec_text() {
        let r = Reply::Welcome { nick: "alice".into() };
        assert_eq!(
            r.format("ft_irc.min"),
            ":ft_irc.min 001 alice :Welcome to ft_irc, alice\r\n"
        );
    }

    #[test]
    fn nickname_in_use_uses_star_placeholder() {
        let r = Reply::NicknameInUse { nick: "alice".into() };
        assert_eq!(
            r.format("ft_irc.min"),
            ":ft_irc.min 433 * alice :Nickname is already in use\r\n"
        );
    }

    #[test]
    fn name_reply_has_equals_sign_field() {
        let r = Reply::NameReply {
            nick: "alice".into(),
            chan: "#chan".into(),
            names: "@alice".into(),
        };
        assert_eq!(
            r.format("ft_irc.min"),
            ":ft_irc.min 353 alice = #chan :@alice\r\n"
        );
    }

    #[test]
    fn echo_uses_source_prefix() {
        let line = format_echo("alice", "a", "ft_irc.min", "KICK", "#chan bob :bye");
        assert_eq!(line, ":alice!a@ft_irc.min KICK #chan bob :bye\r\n");
    }

    #[test]
    fn echo_placeholders_when_unset() {
        let line = format_echo("", "", "ft_irc.min", "PRIVMSG", "#chan :hi");
        assert_eq!(line, ":*!user@ft_irc.min PRIVMSG #chan :hi\r\n");
    }
}
