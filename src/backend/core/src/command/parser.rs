//! Console command grammar.
//!
//! A command is whitespace-separated tokens dispatched on the first one:
//!
//! ```text
//! !homework <unit> <range...>     assign homework
//! !stamp +N | -N                  add or remove stamps
//! !penalty N                      penalty sheets (sign ignored)
//! <unit> <question> <O|X|△>       record a graded question
//! ```
//!
//! Parsing never touches a ledger. A parsed [`Command`] expands into the
//! primitive [`Action`]s the dispatcher applies.

use thiserror::Error;

use crate::ledger::{GradeStatus, RewardKind};

/// Unit and range used when `!homework` omits them.
pub const UNSPECIFIED: &str = "unspecified";

/// Unit recorded on homework created by `!penalty`.
pub const PENALTY_UNIT: &str = "penalty";

const HOMEWORK_HEADS: [&str; 2] = ["!homework", "!숙제"];
const STAMP_HEADS: [&str; 2] = ["!stamp", "!도장"];
const PENALTY_HEADS: [&str; 2] = ["!penalty", "!징벌"];

/// Why a command line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid command: {input}")]
    TooFewTokens { input: String },

    #[error("Invalid status: {token} (expected O/X/△)")]
    InvalidStatus { token: String },

    #[error("Invalid amount: {token}")]
    InvalidAmount { token: String },
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `<unit> <question> <status>`
    RecordGrade {
        unit: String,
        question: String,
        status: GradeStatus,
    },
    /// `!homework <unit> <range...>`
    AssignHomework { unit: String, range: String },
    /// `!stamp +N`
    AddStamps { amount: u32 },
    /// `!stamp -N`
    RemoveStamps { amount: u32 },
    /// `!penalty N`
    Penalty { sheets: u32 },
    /// `!stamp` without a sign: accepted, does nothing.
    Ignored,
}

/// A single ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RecordGrade {
        unit: String,
        question: String,
        status: GradeStatus,
    },
    AssignHomework {
        unit: String,
        range: String,
    },
    AdjustStamps {
        delta: i64,
    },
    RecordReward {
        kind: RewardKind,
        value: u32,
    },
}

impl Command {
    /// Expand into ledger mutations, in application order.
    ///
    /// Adding stamps also writes a stamp reward event; removing them does not.
    /// A penalty always produces both a homework item and a penalty event.
    pub fn actions(&self) -> Vec<Action> {
        match self {
            Command::RecordGrade {
                unit,
                question,
                status,
            } => vec![Action::RecordGrade {
                unit: unit.clone(),
                question: question.clone(),
                status: *status,
            }],
            Command::AssignHomework { unit, range } => vec![Action::AssignHomework {
                unit: unit.clone(),
                range: range.clone(),
            }],
            Command::AddStamps { amount } => vec![
                Action::AdjustStamps {
                    delta: i64::from(*amount),
                },
                Action::RecordReward {
                    kind: RewardKind::Stamp,
                    value: *amount,
                },
            ],
            Command::RemoveStamps { amount } => vec![Action::AdjustStamps {
                delta: -i64::from(*amount),
            }],
            Command::Penalty { sheets } => vec![
                Action::AssignHomework {
                    unit: PENALTY_UNIT.to_string(),
                    range: penalty_range(*sheets),
                },
                Action::RecordReward {
                    kind: RewardKind::Penalty,
                    value: *sheets,
                },
            ],
            Command::Ignored => Vec::new(),
        }
    }

    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::RecordGrade { .. } => "grade",
            Command::AssignHomework { .. } => "homework",
            Command::AddStamps { .. } | Command::RemoveStamps { .. } => "stamp",
            Command::Penalty { .. } => "penalty",
            Command::Ignored => "ignored",
        }
    }
}

/// Homework range text for a penalty of `sheets` sheets.
pub fn penalty_range(sheets: u32) -> String {
    format!("{} sheets", sheets)
}

/// Parse one console line.
pub fn parse(raw: &str) -> Result<Command, ParseError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let Some(&head) = tokens.first() else {
        return Err(ParseError::TooFewTokens {
            input: raw.trim().to_string(),
        });
    };

    if HOMEWORK_HEADS.contains(&head) {
        return Ok(parse_homework(&tokens[1..]));
    }
    if STAMP_HEADS.contains(&head) {
        return parse_stamp(tokens.get(1).copied());
    }
    if PENALTY_HEADS.contains(&head) {
        return parse_penalty(tokens.get(1).copied());
    }

    parse_grade(raw, &tokens)
}

fn parse_homework(args: &[&str]) -> Command {
    let unit = args.first().map_or(UNSPECIFIED, |u| *u).to_string();
    let range = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        UNSPECIFIED.to_string()
    };
    Command::AssignHomework { unit, range }
}

fn parse_stamp(arg: Option<&str>) -> Result<Command, ParseError> {
    let Some(token) = arg else {
        return Ok(Command::Ignored);
    };
    let negative = match token.chars().next() {
        Some('+') => false,
        Some('-') => true,
        _ => return Ok(Command::Ignored),
    };
    let amount = parse_amount(token)?;
    Ok(if negative {
        Command::RemoveStamps { amount }
    } else {
        Command::AddStamps { amount }
    })
}

fn parse_penalty(arg: Option<&str>) -> Result<Command, ParseError> {
    let sheets = match arg {
        Some(token) => parse_amount(token)?,
        None => 0,
    };
    Ok(Command::Penalty { sheets })
}

fn parse_grade(raw: &str, tokens: &[&str]) -> Result<Command, ParseError> {
    if tokens.len() < 2 {
        return Err(ParseError::TooFewTokens {
            input: raw.trim().to_string(),
        });
    }
    let status_token = tokens.get(2).copied().unwrap_or_default();
    let status = GradeStatus::from_token(status_token).ok_or_else(|| ParseError::InvalidStatus {
        token: status_token.to_uppercase(),
    })?;
    Ok(Command::RecordGrade {
        unit: tokens[0].to_string(),
        question: tokens[1].to_string(),
        status,
    })
}

/// Read an amount: one leading sign is dropped, then the leading ASCII digits
/// are the value, so `+2장` is 2. Amounts past `u32::MAX` saturate.
fn parse_amount(token: &str) -> Result<u32, ParseError> {
    let unsigned = token
        .strip_prefix('+')
        .or_else(|| token.strip_prefix('-'))
        .unwrap_or(token);
    let digits: &str = &unsigned[..unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len())];
    if digits.is_empty() {
        return Err(ParseError::InvalidAmount {
            token: token.to_string(),
        });
    }
    // Only overflow can fail on a non-empty digit run.
    Ok(digits.parse::<u32>().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_command() {
        assert_eq!(
            parse("algebra 12 X").unwrap(),
            Command::RecordGrade {
                unit: "algebra".to_string(),
                question: "12".to_string(),
                status: GradeStatus::Incorrect,
            }
        );
    }

    #[test]
    fn test_grade_status_is_case_insensitive() {
        let cmd = parse("  polygon   7  o ").unwrap();
        assert!(matches!(cmd, Command::RecordGrade { status: GradeStatus::Correct, .. }));
        let cmd = parse("polygon 8 partial").unwrap();
        assert!(matches!(cmd, Command::RecordGrade { status: GradeStatus::Partial, .. }));
        let cmd = parse("polygon 9 △").unwrap();
        assert!(matches!(cmd, Command::RecordGrade { status: GradeStatus::Partial, .. }));
    }

    #[test]
    fn test_grade_rejections() {
        assert_eq!(
            parse("algebra").unwrap_err(),
            ParseError::TooFewTokens {
                input: "algebra".to_string()
            }
        );
        assert!(matches!(parse("   ").unwrap_err(), ParseError::TooFewTokens { .. }));
        assert_eq!(
            parse("algebra 12").unwrap_err(),
            ParseError::InvalidStatus { token: String::new() }
        );
        assert_eq!(
            parse("algebra 12 y").unwrap_err(),
            ParseError::InvalidStatus { token: "Y".to_string() }
        );
    }

    #[test]
    fn test_homework_command() {
        assert_eq!(
            parse("!homework algebra 12-15p odd only").unwrap(),
            Command::AssignHomework {
                unit: "algebra".to_string(),
                range: "12-15p odd only".to_string(),
            }
        );
        assert_eq!(
            parse("!homework").unwrap(),
            Command::AssignHomework {
                unit: UNSPECIFIED.to_string(),
                range: UNSPECIFIED.to_string(),
            }
        );
        assert_eq!(
            parse("!숙제 다각형").unwrap(),
            Command::AssignHomework {
                unit: "다각형".to_string(),
                range: UNSPECIFIED.to_string(),
            }
        );
    }

    #[test]
    fn test_stamp_command_requires_sign() {
        assert_eq!(parse("!stamp +5").unwrap(), Command::AddStamps { amount: 5 });
        assert_eq!(parse("!stamp -3").unwrap(), Command::RemoveStamps { amount: 3 });
        assert_eq!(parse("!도장 +1").unwrap(), Command::AddStamps { amount: 1 });
        assert_eq!(parse("!stamp 5").unwrap(), Command::Ignored);
        assert_eq!(parse("!stamp").unwrap(), Command::Ignored);
        assert!(matches!(parse("!stamp +abc").unwrap_err(), ParseError::InvalidAmount { .. }));
    }

    #[test]
    fn test_oversized_amounts_saturate() {
        assert_eq!(
            parse("!stamp -99999999999").unwrap(),
            Command::RemoveStamps { amount: u32::MAX }
        );
        assert_eq!(
            parse("!penalty 5000000000").unwrap(),
            Command::Penalty { sheets: u32::MAX }
        );
        assert!(matches!(parse("!stamp -").unwrap_err(), ParseError::InvalidAmount { .. }));
    }

    #[test]
    fn test_stamp_actions() {
        assert_eq!(
            parse("!stamp +5").unwrap().actions(),
            vec![
                Action::AdjustStamps { delta: 5 },
                Action::RecordReward {
                    kind: RewardKind::Stamp,
                    value: 5
                },
            ]
        );
        assert_eq!(
            parse("!stamp -3").unwrap().actions(),
            vec![Action::AdjustStamps { delta: -3 }]
        );
        assert!(parse("!stamp 3").unwrap().actions().is_empty());
        assert_eq!(parse("!stamp +0").unwrap().actions().len(), 2);
    }

    #[test]
    fn test_penalty_ignores_sign() {
        for raw in ["!penalty +3", "!penalty -3", "!penalty 3", "!징벌 3장"] {
            assert_eq!(parse(raw).unwrap(), Command::Penalty { sheets: 3 }, "{}", raw);
        }
        assert_eq!(parse("!penalty").unwrap(), Command::Penalty { sheets: 0 });
        assert!(matches!(parse("!penalty x").unwrap_err(), ParseError::InvalidAmount { .. }));

        assert_eq!(
            parse("!penalty -3").unwrap().actions(),
            vec![
                Action::AssignHomework {
                    unit: PENALTY_UNIT.to_string(),
                    range: "3 sheets".to_string(),
                },
                Action::RecordReward {
                    kind: RewardKind::Penalty,
                    value: 3
                },
            ]
        );
    }

    #[test]
    fn test_heads_are_case_sensitive() {
        // Unknown heads fall through to the grading form.
        assert_eq!(
            parse("!Stamp +1 X").unwrap(),
            Command::RecordGrade {
                unit: "!Stamp".to_string(),
                question: "+1".to_string(),
                status: GradeStatus::Incorrect,
            }
        );
    }
}
