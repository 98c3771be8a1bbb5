//! Grammar coverage for console commands.

use tutor_core::command::parser::{PENALTY_UNIT, UNSPECIFIED};
use tutor_core::prelude::*;

#[test]
fn test_grading_commands_keep_their_fields() {
    let cases = [
        ("algebra 12 X", "algebra", "12", GradeStatus::Incorrect),
        ("algebra 12 x", "algebra", "12", GradeStatus::Incorrect),
        ("다각형 3-2 O", "다각형", "3-2", GradeStatus::Correct),
        ("fractions 7a △", "fractions", "7a", GradeStatus::Partial),
        ("fractions 7b Partial trailing", "fractions", "7b", GradeStatus::Partial),
    ];

    for (raw, unit, question, status) in cases {
        assert_eq!(
            parse(raw).unwrap(),
            Command::RecordGrade {
                unit: unit.to_string(),
                question: question.to_string(),
                status,
            },
            "{}",
            raw
        );
    }
}

#[test]
fn test_rejection_reasons() {
    assert!(matches!(parse("").unwrap_err(), ParseError::TooFewTokens { .. }));
    assert!(matches!(parse("algebra").unwrap_err(), ParseError::TooFewTokens { .. }));
    assert!(matches!(parse("algebra 12").unwrap_err(), ParseError::InvalidStatus { .. }));
    assert!(matches!(parse("algebra 12 OK").unwrap_err(), ParseError::InvalidStatus { .. }));
}

#[test]
fn test_special_commands_are_never_too_short() {
    assert_eq!(
        parse("!homework").unwrap(),
        Command::AssignHomework {
            unit: UNSPECIFIED.to_string(),
            range: UNSPECIFIED.to_string(),
        }
    );
    assert_eq!(parse("!stamp").unwrap(), Command::Ignored);
    assert_eq!(parse("!penalty").unwrap(), Command::Penalty { sheets: 0 });
}

#[test]
fn test_sign_asymmetry_between_stamp_and_penalty() {
    assert_eq!(parse("!stamp 3").unwrap().actions(), Vec::<Action>::new());
    assert_eq!(
        parse("!penalty 3").unwrap().actions(),
        parse("!penalty -3").unwrap().actions()
    );
    assert_eq!(
        parse("!penalty +3").unwrap().actions()[0],
        Action::AssignHomework {
            unit: PENALTY_UNIT.to_string(),
            range: "3 sheets".to_string(),
        }
    );
}

#[test]
fn test_parse_errors_convert_to_tutor_errors() {
    let err: TutorError = parse("algebra 1 Q").unwrap_err().into();
    assert_eq!(err.code(), ErrorCode::InvalidStatus);
}
