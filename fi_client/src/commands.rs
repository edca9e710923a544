use flexinvest::pages::TransactionTab;
use std::fmt;
use std::path::PathBuf;

/// A line of shell input, parsed.
///
/// Amounts stay as typed; the page that receives them validates them and
/// reports problems as toasts, exactly as a form would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Navigate to a path through the route guards
    Go(String),
    Refresh,
    Help,
    Quit,

    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        phone: String,
        full_name: String,
    },
    Verify(String),
    Resend,
    Forgot(String),
    ResetOtp(String),
    ResetPassword {
        password: String,
        confirm: String,
    },
    AdminLogin {
        email: String,
        password: String,
    },
    Logout,
    AdminLogout,

    Invest(String),
    Deposit {
        amount: String,
        proof: PathBuf,
    },
    Bank {
        account_number: String,
        bank_name: String,
        account_name: String,
    },
    Withdraw(String),
    Tab(TransactionTab),
    Complain {
        subject: String,
        message: String,
    },

    Credit {
        user_id: String,
        amount: String,
        reason: String,
    },
    Approve(String),
    Reject {
        id: String,
        reason: String,
    },
    Proof(String),
    Respond {
        id: String,
        response: String,
    },
}

impl Command {
    /// Keyword the command is typed with
    pub fn name(&self) -> &'static str {
        match self {
            Command::Go(_) => "go",
            Command::Refresh => "refresh",
            Command::Help => "help",
            Command::Quit => "quit",
            Command::Login { .. } => "login",
            Command::Register { .. } => "register",
            Command::Verify(_) => "verify",
            Command::Resend => "resend",
            Command::Forgot(_) => "forgot",
            Command::ResetOtp(_) => "reset-otp",
            Command::ResetPassword { .. } => "reset-password",
            Command::AdminLogin { .. } => "admin-login",
            Command::Logout => "logout",
            Command::AdminLogout => "admin-logout",
            Command::Invest(_) => "invest",
            Command::Deposit { .. } => "deposit",
            Command::Bank { .. } => "bank",
            Command::Withdraw(_) => "withdraw",
            Command::Tab(_) => "tab",
            Command::Complain { .. } => "complain",
            Command::Credit { .. } => "credit",
            Command::Approve(_) => "approve",
            Command::Reject { .. } => "reject",
            Command::Proof(_) => "proof",
            Command::Respond { .. } => "respond",
        }
    }
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required argument is missing.
    MissingArgument {
        command: &'static str,
        usage: &'static str,
    },
    /// Free text must be split into two parts with ` / `.
    MissingSeparator {
        command: &'static str,
        usage: &'static str,
    },
    /// Unknown transactions tab.
    InvalidTab(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument { command, usage } => {
                write!(f, "'{}' is missing an argument (e.g., '{}')", command, usage)
            }
            Self::MissingSeparator { command, usage } => write!(
                f,
                "'{}' takes two texts separated by ' / ' (e.g., '{}')",
                command, usage
            ),
            Self::InvalidTab(value) => write!(
                f,
                "Invalid tab '{}'. Use 'tab all', 'tab deposits', 'tab withdrawals' or 'tab investments'",
                value
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
Navigation:
  go <path>                         open a page, e.g. 'go /dashboard/investments'
  refresh                           reload the current page
  help, quit

Account:
  login <email> <password>
  register <email> <password> <phone> <full name>
  verify <otp>                      confirm the registration code
  resend                            send a new registration code
  forgot <email>                    start a password reset
  reset-otp <otp>
  reset-password <new> <confirm>
  logout

Dashboard:
  invest <package id>
  deposit <amount> <proof file>
  bank <account number> <bank name> / <account name>
  withdraw <amount>
  tab <all|deposits|withdrawals|investments>
  complain <subject> / <message>

Admin:
  admin-login <email> <password>
  admin-logout
  credit <user id> <amount> <reason>
  approve <id>
  reject <id> <reason>
  proof <deposit id>
  respond <complaint id> <response>
";

/// Parse a command string into a [`Command`].
///
/// # Examples
///
/// ```
/// use fi_client::commands::{Command, parse_command};
///
/// assert_eq!(parse_command("refresh"), Ok(Command::Refresh));
/// assert_eq!(parse_command("withdraw 5000"), Ok(Command::Withdraw("5000".to_string())));
/// assert!(parse_command("dance").is_err());
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    // Try single-word commands first
    match trimmed {
        "refresh" => return Ok(Command::Refresh),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        "resend" => return Ok(Command::Resend),
        "logout" => return Ok(Command::Logout),
        "admin-logout" => return Ok(Command::AdminLogout),
        _ => {}
    }

    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };
    let parts: Vec<&str> = rest.split_ascii_whitespace().collect();

    match head {
        "go" => one("go", "go /dashboard", &parts).map(Command::Go),
        "login" => {
            let (email, password) = two("login", "login ada@example.com secret1", &parts)?;
            Ok(Command::Login { email, password })
        }
        "admin-login" => {
            let (email, password) =
                two("admin-login", "admin-login admin@flexinvest.ng secret1", &parts)?;
            Ok(Command::AdminLogin { email, password })
        }
        "register" => parse_register(&parts),
        "verify" => one("verify", "verify 123456", &parts).map(Command::Verify),
        "forgot" => one("forgot", "forgot ada@example.com", &parts).map(Command::Forgot),
        "reset-otp" => one("reset-otp", "reset-otp 123456", &parts).map(Command::ResetOtp),
        "reset-password" => {
            let (password, confirm) =
                two("reset-password", "reset-password newpass1 newpass1", &parts)?;
            Ok(Command::ResetPassword { password, confirm })
        }
        "invest" => one("invest", "invest pkg_1", &parts).map(Command::Invest),
        "deposit" => {
            let (amount, proof) = two("deposit", "deposit 25200 receipt.png", &parts)?;
            Ok(Command::Deposit {
                amount,
                proof: PathBuf::from(proof),
            })
        }
        "bank" => parse_bank(&parts),
        "withdraw" => one("withdraw", "withdraw 5000", &parts).map(Command::Withdraw),
        "tab" => parse_tab(&parts),
        "complain" => {
            let (subject, message) = split_texts(
                "complain",
                "complain Late payout / My payout is two days late",
                rest,
            )?;
            Ok(Command::Complain { subject, message })
        }
        "credit" => {
            let usage = "credit u-1 5000 Referral bonus";
            let (user_id, amount) = two("credit", usage, &parts)?;
            let reason = tail("credit", usage, &parts, 2)?;
            Ok(Command::Credit {
                user_id,
                amount,
                reason,
            })
        }
        "approve" => one("approve", "approve d-1", &parts).map(Command::Approve),
        "reject" => {
            let usage = "reject d-1 Proof is unreadable";
            let id = one("reject", usage, &parts)?;
            let reason = tail("reject", usage, &parts, 1)?;
            Ok(Command::Reject { id, reason })
        }
        "proof" => one("proof", "proof d-1", &parts).map(Command::Proof),
        "respond" => {
            let usage = "respond c-1 Your payout has been sent";
            let id = one("respond", usage, &parts)?;
            let response = tail("respond", usage, &parts, 1)?;
            Ok(Command::Respond { id, response })
        }
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse: "register EMAIL PASSWORD PHONE FULL NAME..."
fn parse_register(parts: &[&str]) -> Result<Command, ParseError> {
    let usage = "register ada@example.com secret1 08012345678 Ada Obi";
    match parts {
        [email, password, phone, name @ ..] if !name.is_empty() => Ok(Command::Register {
            email: email.to_string(),
            password: password.to_string(),
            phone: phone.to_string(),
            full_name: name.join(" "),
        }),
        _ => Err(ParseError::MissingArgument {
            command: "register",
            usage,
        }),
    }
}

/// Parse: "bank ACCOUNT_NUMBER BANK NAME... / ACCOUNT NAME..."
fn parse_bank(parts: &[&str]) -> Result<Command, ParseError> {
    let usage = "bank 0123456789 Kuda Bank / Ada Obi";
    let account_number = one("bank", usage, parts)?;
    let names = parts[1..].join(" ");
    let (bank_name, account_name) = split_texts("bank", usage, &names)?;
    Ok(Command::Bank {
        account_number,
        bank_name,
        account_name,
    })
}

fn parse_tab(parts: &[&str]) -> Result<Command, ParseError> {
    let value = one("tab", "tab deposits", parts)?;
    value
        .parse::<TransactionTab>()
        .map(Command::Tab)
        .map_err(|_| ParseError::InvalidTab(value))
}

fn one(command: &'static str, usage: &'static str, parts: &[&str]) -> Result<String, ParseError> {
    parts
        .first()
        .map(|s| s.to_string())
        .ok_or(ParseError::MissingArgument { command, usage })
}

fn two(
    command: &'static str,
    usage: &'static str,
    parts: &[&str],
) -> Result<(String, String), ParseError> {
    match parts {
        [first, second, ..] => Ok((first.to_string(), second.to_string())),
        _ => Err(ParseError::MissingArgument { command, usage }),
    }
}

/// Everything from word `from` on, joined back into text
fn tail(
    command: &'static str,
    usage: &'static str,
    parts: &[&str],
    from: usize,
) -> Result<String, ParseError> {
    match parts.get(from..) {
        Some(words) if !words.is_empty() => Ok(words.join(" ")),
        _ => Err(ParseError::MissingArgument { command, usage }),
    }
}

fn split_texts(
    command: &'static str,
    usage: &'static str,
    text: &str,
) -> Result<(String, String), ParseError> {
    let (left, right) = text
        .split_once('/')
        .ok_or(ParseError::MissingSeparator { command, usage })?;
    Ok((left.trim().to_string(), right.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Single-word command tests ===

    #[test]
    fn test_parse_refresh() {
        assert_eq!(parse_command("refresh"), Ok(Command::Refresh));
    }

    #[test]
    fn test_parse_help_aliases() {
        assert_eq!(parse_command("help"), Ok(Command::Help));
        assert_eq!(parse_command("?"), Ok(Command::Help));
    }

    #[test]
    fn test_parse_quit_aliases() {
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_logouts() {
        assert_eq!(parse_command("logout"), Ok(Command::Logout));
        assert_eq!(parse_command("admin-logout"), Ok(Command::AdminLogout));
    }

    #[test]
    fn test_parse_resend() {
        assert_eq!(parse_command("resend"), Ok(Command::Resend));
    }

    // === Whitespace handling ===

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        assert_eq!(parse_command("  refresh  "), Ok(Command::Refresh));
        assert_eq!(
            parse_command("  go   /dashboard "),
            Ok(Command::Go("/dashboard".to_string()))
        );
    }

    // === Account commands ===

    #[test]
    fn test_parse_login() {
        assert_eq!(
            parse_command("login ada@example.com secret1"),
            Ok(Command::Login {
                email: "ada@example.com".to_string(),
                password: "secret1".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_login_missing_password() {
        assert!(matches!(
            parse_command("login ada@example.com"),
            Err(ParseError::MissingArgument { command: "login", .. })
        ));
    }

    #[test]
    fn test_parse_register_joins_full_name() {
        assert_eq!(
            parse_command("register ada@example.com secret1 08012345678 Ada  Obi"),
            Ok(Command::Register {
                email: "ada@example.com".to_string(),
                password: "secret1".to_string(),
                phone: "08012345678".to_string(),
                full_name: "Ada Obi".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_register_without_name() {
        assert!(matches!(
            parse_command("register ada@example.com secret1 08012345678"),
            Err(ParseError::MissingArgument { command: "register", .. })
        ));
    }

    #[test]
    fn test_parse_password_reset_steps() {
        assert_eq!(
            parse_command("forgot ada@example.com"),
            Ok(Command::Forgot("ada@example.com".to_string()))
        );
        assert_eq!(
            parse_command("reset-otp 123456"),
            Ok(Command::ResetOtp("123456".to_string()))
        );
        assert_eq!(
            parse_command("reset-password newpass1 newpass1"),
            Ok(Command::ResetPassword {
                password: "newpass1".to_string(),
                confirm: "newpass1".to_string(),
            })
        );
    }

    // === Dashboard commands ===

    #[test]
    fn test_parse_deposit() {
        assert_eq!(
            parse_command("deposit 25,200 /tmp/receipt.png"),
            Ok(Command::Deposit {
                amount: "25,200".to_string(),
                proof: PathBuf::from("/tmp/receipt.png"),
            })
        );
    }

    #[test]
    fn test_parse_bank_with_separator() {
        assert_eq!(
            parse_command("bank 0123456789 Kuda Bank / Ada Obi"),
            Ok(Command::Bank {
                account_number: "0123456789".to_string(),
                bank_name: "Kuda Bank".to_string(),
                account_name: "Ada Obi".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_bank_without_separator() {
        assert!(matches!(
            parse_command("bank 0123456789 Kuda Bank Ada Obi"),
            Err(ParseError::MissingSeparator { command: "bank", .. })
        ));
    }

    #[test]
    fn test_parse_tab() {
        assert_eq!(
            parse_command("tab withdrawals"),
            Ok(Command::Tab(TransactionTab::Withdrawals))
        );
    }

    #[test]
    fn test_parse_tab_invalid() {
        assert_eq!(
            parse_command("tab savings"),
            Err(ParseError::InvalidTab("savings".to_string()))
        );
    }

    #[test]
    fn test_parse_complain() {
        assert_eq!(
            parse_command("complain Late payout / Still waiting since Monday"),
            Ok(Command::Complain {
                subject: "Late payout".to_string(),
                message: "Still waiting since Monday".to_string(),
            })
        );
    }

    // === Admin commands ===

    #[test]
    fn test_parse_credit_keeps_reason_text() {
        assert_eq!(
            parse_command("credit u-1 5000 Referral bonus for May"),
            Ok(Command::Credit {
                user_id: "u-1".to_string(),
                amount: "5000".to_string(),
                reason: "Referral bonus for May".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_credit_without_reason() {
        assert!(matches!(
            parse_command("credit u-1 5000"),
            Err(ParseError::MissingArgument { command: "credit", .. })
        ));
    }

    #[test]
    fn test_parse_reject_with_reason() {
        assert_eq!(
            parse_command("reject d-1 Proof is unreadable"),
            Ok(Command::Reject {
                id: "d-1".to_string(),
                reason: "Proof is unreadable".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_reject_without_reason() {
        assert!(matches!(
            parse_command("reject d-1"),
            Err(ParseError::MissingArgument { command: "reject", .. })
        ));
    }

    #[test]
    fn test_parse_respond() {
        assert_eq!(
            parse_command("respond c-1 Paid out this morning"),
            Ok(Command::Respond {
                id: "c-1".to_string(),
                response: "Paid out this morning".to_string(),
            })
        );
    }

    // === Error cases ===

    #[test]
    fn test_parse_unrecognized() {
        assert_eq!(
            parse_command("dance"),
            Err(ParseError::UnrecognizedCommand("dance".to_string()))
        );
    }

    #[test]
    fn test_parse_empty_is_unrecognized() {
        assert!(matches!(
            parse_command("   "),
            Err(ParseError::UnrecognizedCommand(_))
        ));
    }

    #[test]
    fn test_error_messages_are_actionable() {
        let err = parse_command("withdraw").unwrap_err();
        assert!(err.to_string().contains("withdraw 5000"));

        let err = parse_command("dance").unwrap_err();
        assert!(err.to_string().contains("help"));
    }
}
