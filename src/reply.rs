//! Numeric reply classification.
//!
//! IRC servers report status through 3-digit textual command codes. This
//! module maps those codes to symbolic [`ReplyCode`] names and decides, per
//! inbound command string, whether it takes the numeric route or the verb
//! route. The two routes never collide: a command is numeric only when it is
//! one to three decimal digits and nothing else.

/// How an inbound command string is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A numeric code with a known symbolic name.
    Reply(ReplyCode),
    /// Digits, but no entry in the table. Observed and dropped.
    Numeric(u16),
    /// An alphabetic verb (`JOIN`, `PING`, ...), routed by verb matching.
    Verb,
}

/// Classify a command string as a numeric reply or a verb.
pub fn classify(command: &str) -> Classification {
    let is_numeric = !command.is_empty()
        && command.len() <= 3
        && command.bytes().all(|b| b.is_ascii_digit());
    if !is_numeric {
        return Classification::Verb;
    }
    match command.parse::<u16>() {
        Ok(code) => match ReplyCode::from_code(code) {
            Some(reply) => Classification::Reply(reply),
            None => Classification::Numeric(code),
        },
        Err(_) => Classification::Verb,
    }
}

macro_rules! reply_codes {
    ($($(#[$meta:meta])* $name:ident = $code:literal,)+) => {
        /// Symbolic names for the numeric replies and errors a server sends
        /// (001–502 range). Pure lookup data; built once, immutable.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum ReplyCode {
            $($(#[$meta])* $name = $code,)+
        }

        impl ReplyCode {
            /// Look up a numeric code. `None` for codes with no table entry.
            pub fn from_code(code: u16) -> Option<Self> {
                match code {
                    $($code => Some(Self::$name),)+
                    _ => None,
                }
            }

            /// The wire value of this reply.
            pub fn code(self) -> u16 {
                self as u16
            }
        }
    };
}

reply_codes! {
    // 001-005: sent on successful registration.
    Welcome = 1,
    YourHost = 2,
    Created = 3,
    MyInfo = 4,
    Bounce = 5,

    // Command responses.
    Away = 301,
    UserHost = 302,
    Ison = 303,
    UnAway = 305,
    NowAway = 306,
    WhoisUser = 311,
    WhoisServer = 312,
    WhoisOperator = 313,
    WhowasUser = 314,
    EndOfWho = 315,
    WhoisIdle = 317,
    EndOfWhois = 318,
    WhoisChannels = 319,
    ListStart = 321,
    List = 322,
    ListEnd = 323,
    ChannelModeIs = 324,
    UniqOpIs = 325,
    NoTopic = 331,
    Topic = 332,
    Inviting = 341,
    Summoning = 342,
    InviteList = 346,
    EndOfInviteList = 347,
    ExceptList = 348,
    EndOfExceptList = 349,
    Version = 351,
    WhoReply = 352,
    NamReply = 353,
    Links = 364,
    EndOfLinks = 365,
    EndOfNames = 366,
    BanList = 367,
    EndOfBanList = 368,
    EndOfWhowas = 369,
    Info = 371,
    /// One MOTD body line.
    Motd = 372,
    EndOfInfo = 374,
    /// Start of the MOTD block.
    MotdStart = 375,
    /// End of the MOTD block.
    EndOfMotd = 376,
    YoureOper = 381,
    Rehashing = 382,
    YoureService = 383,
    Time = 391,
    UsersStart = 392,
    Users = 393,
    EndOfUsers = 394,
    NoUsers = 395,

    // TRACE family.
    TraceLink = 200,
    TraceConnecting = 201,
    TraceHandshake = 202,
    TraceUnknown = 203,
    TraceOperator = 204,
    TraceUser = 205,
    TraceServer = 206,
    TraceService = 207,
    TraceNewType = 208,
    TraceClass = 209,
    TraceReconnect = 210,
    TraceLog = 261,
    TraceEnd = 262,

    // STATS family.
    StatsLinkInfo = 211,
    StatsCommands = 212,
    EndOfStats = 219,
    UmodeIs = 221,
    ServList = 234,
    ServListEnd = 235,
    StatsUptime = 242,
    StatsOline = 243,

    // LUSER / ADMIN.
    LuserClient = 251,
    LuserOp = 252,
    LuserUnknown = 253,
    LuserChannels = 254,
    LuserMe = 255,
    AdminMe = 256,
    AdminLoc1 = 257,
    AdminLoc2 = 258,
    AdminEmail = 259,
    TryAgain = 263,

    // Errors.
    NoSuchNick = 401,
    NoSuchServer = 402,
    NoSuchChannel = 403,
    CannotSendToChan = 404,
    TooManyChannels = 405,
    WasNoSuchNick = 406,
    TooManyTargets = 407,
    NoSuchService = 408,
    NoOrigin = 409,
    NoRecipient = 411,
    NoTextToSend = 412,
    NoTopLevel = 413,
    WildTopLevel = 414,
    BadMask = 415,
    UnknownCommand = 421,
    NoMotd = 422,
    NoAdminInfo = 423,
    FileError = 424,
    NoNicknameGiven = 431,
    ErroneousNickname = 432,
    NicknameInUse = 433,
    NickCollision = 436,
    UnavailResource = 437,
    UserNotInChannel = 441,
    NotOnChannel = 442,
    UserOnChannel = 443,
    NoLogin = 444,
    SummonDisabled = 445,
    UsersDisabled = 446,
    NotRegistered = 451,
    NeedMoreParams = 461,
    AlreadyRegistered = 462,
    NoPermForHost = 463,
    PasswdMismatch = 464,
    YoureBannedCreep = 465,
    YouWillBeBanned = 466,
    KeySet = 467,
    ChannelIsFull = 471,
    UnknownMode = 472,
    InviteOnlyChan = 473,
    BannedFromChan = 474,
    BadChannelKey = 475,
    BadChanMask = 476,
    NoChanModes = 477,
    BanListFull = 478,
    NoPrivileges = 481,
    ChanOPrivsNeeded = 482,
    CantKillServer = 483,
    Restricted = 484,
    UniqOpPrivsNeeded = 485,
    NoOperHost = 491,
    NoServiceHost = 492,
    UmodeUnknownFlag = 501,
    UsersDontMatch = 502,

    // Reserved / rarely seen, kept for table completeness.
    ServiceInfo = 231,
    EndOfServices = 232,
    Service = 233,
    None = 300,
    WhoisChanOp = 316,
    KillDone = 361,
    Closing = 362,
    CloseEnd = 363,
    InfoStart = 373,
    MyPortIs = 384,
    StatsCline = 213,
    StatsNline = 214,
    StatsIline = 215,
    StatsKline = 216,
    StatsQline = 217,
    StatsYline = 218,
    StatsVline = 240,
    StatsLline = 241,
    StatsHline = 244,
    StatsPing = 246,
    StatsBline = 247,
    StatsDline = 250,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_numerics() {
        assert_eq!(classify("375"), Classification::Reply(ReplyCode::MotdStart));
        assert_eq!(classify("372"), Classification::Reply(ReplyCode::Motd));
        assert_eq!(classify("376"), Classification::Reply(ReplyCode::EndOfMotd));
        assert_eq!(
            classify("433"),
            Classification::Reply(ReplyCode::NicknameInUse)
        );
        assert_eq!(classify("001"), Classification::Reply(ReplyCode::Welcome));
    }

    #[test]
    fn test_classify_verbs() {
        assert_eq!(classify("PRIVMSG"), Classification::Verb);
        assert_eq!(classify("JOIN"), Classification::Verb);
        assert_eq!(classify("PING"), Classification::Verb);
        assert_eq!(classify(""), Classification::Verb);
        // Mixed digit/letter strings are verbs, not numerics.
        assert_eq!(classify("37a"), Classification::Verb);
        assert_eq!(classify("1234"), Classification::Verb);
    }

    #[test]
    fn test_classify_unknown_numeric() {
        assert_eq!(classify("999"), Classification::Numeric(999));
        assert_eq!(classify("245"), Classification::Numeric(245));
    }

    #[test]
    fn test_from_code_roundtrip() {
        assert_eq!(ReplyCode::from_code(375), Some(ReplyCode::MotdStart));
        assert_eq!(ReplyCode::from_code(502), Some(ReplyCode::UsersDontMatch));
        assert_eq!(ReplyCode::from_code(0), None);
        assert_eq!(ReplyCode::MotdStart.code(), 375);
        assert_eq!(ReplyCode::Welcome.code(), 1);
    }
}
