//! Outbound command builders.
//!
//! One builder per protocol command. Whether the last argument is emitted as
//! a trailing (colon-prefixed) parameter is a per-command decision — PRIVMSG
//! text is always trailing, JOIN lists never are — so the policy lives here
//! rather than in the generic codec.

/// `USER <username> <mode> * :<realname>`. Mode is `8` for an invisible
/// registration, `0` otherwise.
pub fn user(username: &str, invisible: bool, realname: &str) -> String {
    format!(
        "USER {} {} * :{}",
        username,
        if invisible { 8 } else { 0 },
        realname
    )
}

/// `NICK <nickname>`.
pub fn nick(nickname: &str) -> String {
    format!("NICK {}", nickname)
}

/// `JOIN <channels> <keys>` with both lists comma-joined. Channels without a
/// key pass an empty string, which keeps list positions aligned.
pub fn join(channels: &[(&str, &str)]) -> String {
    let names: Vec<&str> = channels.iter().map(|(name, _)| *name).collect();
    let keys: Vec<&str> = channels.iter().map(|(_, key)| *key).collect();
    format!("JOIN {} {}", names.join(","), keys.join(","))
}

/// `JOIN 0` — the leave-all-channels sentinel.
pub fn join_zero() -> String {
    "JOIN 0".to_string()
}

/// `PING[ :<param>]`. Bare `PING` when the parameter is empty.
pub fn ping(param: &str) -> String {
    if param.is_empty() {
        "PING".to_string()
    } else {
        format!("PING :{}", param)
    }
}

/// `PONG[ :<param>]`. Bare `PONG` when the parameter is empty.
pub fn pong(param: &str) -> String {
    if param.is_empty() {
        "PONG".to_string()
    } else {
        format!("PONG :{}", param)
    }
}

/// `PRIVMSG <receivers> :<message>` with receivers comma-joined. The message
/// text is always a trailing parameter.
pub fn privmsg(receivers: &[&str], message: &str) -> String {
    format!("PRIVMSG {} :{}", receivers.join(","), message)
}

/// `QUIT[ :<message>]`.
pub fn quit(message: &str) -> String {
    if message.is_empty() {
        "QUIT".to_string()
    } else {
        format!("QUIT :{}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_mode_reflects_invisible_flag() {
        assert_eq!(user("alice", false, "Alice A."), "USER alice 0 * :Alice A.");
        assert_eq!(user("alice", true, "Alice A."), "USER alice 8 * :Alice A.");
    }

    #[test]
    fn test_nick() {
        assert_eq!(nick("alice"), "NICK alice");
    }

    #[test]
    fn test_join_comma_joins_channels_and_keys() {
        assert_eq!(join(&[("#rust", "")]), "JOIN #rust ");
        assert_eq!(
            join(&[("#a", "key1"), ("#b", ""), ("#c", "key3")]),
            "JOIN #a,#b,#c key1,,key3"
        );
        assert_eq!(join_zero(), "JOIN 0");
    }

    #[test]
    fn test_ping_pong_colon_only_with_param() {
        assert_eq!(ping("irc.example.net"), "PING :irc.example.net");
        assert_eq!(ping(""), "PING");
        assert_eq!(pong("tolsun.oulu.fi"), "PONG :tolsun.oulu.fi");
        assert_eq!(pong(""), "PONG");
    }

    #[test]
    fn test_privmsg_trailing_text() {
        assert_eq!(
            privmsg(&["#chan"], "hello world"),
            "PRIVMSG #chan :hello world"
        );
        assert_eq!(
            privmsg(&["alice", "bob"], "hi"),
            "PRIVMSG alice,bob :hi"
        );
    }

    #[test]
    fn test_quit() {
        assert_eq!(quit("Leaving"), "QUIT :Leaving");
        assert_eq!(quit(""), "QUIT");
    }
}
