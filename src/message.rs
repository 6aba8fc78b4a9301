//! IRC wire message codec.
//!
//! Parses single protocol lines of the form
//! `[:prefix ]<command>[ param1][ param2]...[ :trailing]` into [`Message`]
//! values and reassembles them. Parsing is deliberately permissive: the
//! grammar degrades to empty fields instead of rejecting input, because a
//! client must never drop a connection over a malformed line.

use std::fmt;

/// A decoded protocol line. Immutable; built once per inbound or outbound
/// line and not retained after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Originating server or user mask, without the leading `:`.
    pub prefix: Option<String>,
    /// Alphabetic verb (`JOIN`, `PING`, ...) or 3-digit numeric code as text.
    /// Case preserved as received.
    pub command: String,
    /// Ordered parameters, 0..=15 entries. Only the last may contain spaces.
    pub params: Vec<String>,
}

/// Parameter index at which tokenization stops and the remainder of the line
/// is absorbed verbatim, regardless of colons.
const TRAILING_INDEX: usize = 14;

impl Message {
    pub fn new(command: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            prefix: None,
            command: command.into(),
            params,
        }
    }

    /// Decode one line. Never fails: a line that does not fit the grammar
    /// yields empty fields rather than an error.
    pub fn parse(line: &str) -> Self {
        let mut rest = line;

        let prefix = match rest.strip_prefix(':') {
            Some(after) => match after.find(' ') {
                Some(i) => {
                    rest = &after[i + 1..];
                    Some(after[..i].to_string())
                }
                None => {
                    // Prefix with nothing after it; command degrades to empty.
                    rest = "";
                    Some(after.to_string())
                }
            },
            None => None,
        };

        let command = match rest.find(' ') {
            Some(i) => {
                let cmd = rest[..i].to_string();
                rest = &rest[i + 1..];
                cmd
            }
            None => {
                let cmd = rest.to_string();
                rest = "";
                cmd
            }
        };

        let mut params = Vec::new();
        while !rest.is_empty() {
            // Past the 14th parameter everything left is one verbatim
            // trailing parameter, colons and spaces included.
            if params.len() == TRAILING_INDEX {
                params.push(rest.to_string());
                break;
            }
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing.to_string());
                break;
            }
            match rest.find(' ') {
                Some(i) => {
                    params.push(rest[..i].to_string());
                    rest = &rest[i + 1..];
                }
                None => {
                    params.push(rest.to_string());
                    break;
                }
            }
        }

        Self {
            prefix,
            command,
            params,
        }
    }

    /// Encode back into a wire line (without the terminating CRLF).
    ///
    /// The final parameter gets a leading `:` when it contains a space, is
    /// empty, or itself starts with `:` — the generic assembly rule.
    /// Commands with a contextual trailing policy (PRIVMSG text always
    /// trailing, JOIN lists never) build their lines in
    /// [`crate::commands`] instead.
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        write!(f, "{}", self.command)?;
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            let needs_colon =
                i == last && (param.is_empty() || param.contains(' ') || param.starts_with(':'));
            if needs_colon {
                write!(f, " :{}", param)?;
            } else {
                write!(f, " {}", param)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(msg: &Message) -> Vec<&str> {
        msg.params.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_parse_prefixed_privmsg() {
        let msg = Message::parse(":server.example PRIVMSG #chan :hello world");
        assert_eq!(msg.prefix.as_deref(), Some("server.example"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(params(&msg), vec!["#chan", "hello world"]);
    }

    #[test]
    fn test_parse_unprefixed_ping() {
        let msg = Message::parse("PING :tolsun.oulu.fi");
        assert_eq!(msg.prefix, None);
        assert_eq!(msg.command, "PING");
        assert_eq!(params(&msg), vec!["tolsun.oulu.fi"]);
    }

    #[test]
    fn test_parse_no_params_is_empty_vec() {
        let msg = Message::parse("NOTICE");
        assert_eq!(msg.command, "NOTICE");
        assert!(msg.params.is_empty());
    }

    #[test]
    fn test_parse_middle_params_keep_colons_inside_tokens() {
        let msg = Message::parse("MODE #chan +b nick!user@host:1234");
        assert_eq!(params(&msg), vec!["#chan", "+b", "nick!user@host:1234"]);
    }

    #[test]
    fn test_parse_trailing_marker_stops_tokenization() {
        let msg = Message::parse(":nick!u@h PRIVMSG #chan :one :two three");
        assert_eq!(params(&msg), vec!["#chan", "one :two three"]);
    }

    #[test]
    fn test_parse_consecutive_spaces_yield_empty_params() {
        let msg = Message::parse("CMD a  b");
        assert_eq!(params(&msg), vec!["a", "", "b"]);
    }

    #[test]
    fn test_parse_forced_trailing_at_fourteen_params() {
        // 14 middles, then a colon-prefixed 15th with embedded spaces.
        let middles: Vec<String> = (1..=14).map(|i| format!("p{}", i)).collect();
        let line = format!("CMD {} :tail with spaces", middles.join(" "));
        let msg = Message::parse(&line);
        assert_eq!(msg.params.len(), 15);
        assert_eq!(msg.params[13], "p14");
        // The 15th param is verbatim: the colon is part of the remainder once
        // the index threshold is reached, not a trailing marker.
        assert_eq!(msg.params[14], ":tail with spaces");
    }

    #[test]
    fn test_parse_sixteenth_param_absorbed_into_fifteenth() {
        let middles: Vec<String> = (1..=14).map(|i| format!("p{}", i)).collect();
        let line = format!("CMD {} fifteen sixteen more", middles.join(" "));
        let msg = Message::parse(&line);
        assert_eq!(msg.params.len(), 15);
        assert_eq!(msg.params[14], "fifteen sixteen more");
    }

    #[test]
    fn test_parse_prefix_only_line_degrades() {
        let msg = Message::parse(":lonely.prefix");
        assert_eq!(msg.prefix.as_deref(), Some("lonely.prefix"));
        assert_eq!(msg.command, "");
        assert!(msg.params.is_empty());
    }

    #[test]
    fn test_parse_empty_line_degrades() {
        let msg = Message::parse("");
        assert_eq!(msg.prefix, None);
        assert_eq!(msg.command, "");
        assert!(msg.params.is_empty());
    }

    #[test]
    fn test_encode_trailing_colon_rules() {
        let msg = Message::new("PRIVMSG", vec!["#chan".into(), "hello world".into()]);
        assert_eq!(msg.to_line(), "PRIVMSG #chan :hello world");

        let msg = Message::new("JOIN", vec!["#a,#b".into(), "key1,key2".into()]);
        assert_eq!(msg.to_line(), "JOIN #a,#b key1,key2");

        let msg = Message::new("TOPIC", vec!["#chan".into(), String::new()]);
        assert_eq!(msg.to_line(), "TOPIC #chan :");
    }

    #[test]
    fn test_roundtrip_without_trailing_marker() {
        for line in [
            "NICK somebody",
            ":server 001 nick",
            "JOIN #one,#two key1,key2",
            "MODE #chan +o nick",
        ] {
            assert_eq!(Message::parse(line).to_line(), line);
        }
    }

    #[test]
    fn test_roundtrip_preserves_prefix() {
        let line = ":irc.example.net 372 nick :- motd text here";
        let msg = Message::parse(line);
        assert_eq!(msg.to_line(), line);
    }
}
