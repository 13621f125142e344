use crate::domain::model::Command;
use crate::utils::error::CommandParseError;
use std::str::SplitWhitespace;

/// 解析一行指令。
///
/// 指令名稱不分大小寫；空白行與無法辨識的指令回傳 `Ok(None)`，多餘的 token 忽略。
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandParseError> {
    let mut tokens = line.split_whitespace();
    let Some(verb) = tokens.next() else {
        return Ok(None);
    };

    if verb.eq_ignore_ascii_case("addsubject") {
        let mut args = Tokens { verb, tokens };
        Ok(Some(Command::AddSubject {
            department: args.text("department")?,
            course_number: args.integer("courseNumber")?,
            seat_count: args.integer("seatCount")?,
        }))
    } else if verb.eq_ignore_ascii_case("enrollstudent") {
        let mut args = Tokens { verb, tokens };
        Ok(Some(Command::EnrollStudent {
            department: args.text("department")?,
            course_number: args.integer("courseNumber")?,
            first_name: args.text("firstName")?,
            last_name: args.text("lastName")?,
        }))
    } else {
        Ok(None)
    }
}

struct Tokens<'a> {
    verb: &'a str,
    tokens: SplitWhitespace<'a>,
}

impl Tokens<'_> {
    fn text(&mut self, token: &'static str) -> Result<String, CommandParseError> {
        self.tokens
            .next()
            .map(str::to_string)
            .ok_or_else(|| CommandParseError::MissingToken {
                verb: self.verb.to_string(),
                token,
            })
    }

    fn integer(&mut self, token: &'static str) -> Result<u32, CommandParseError> {
        let value = self.text(token)?;
        value
            .parse()
            .map_err(|source| CommandParseError::InvalidInteger {
                token,
                value,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_subject() {
        let command = parse_line("addsubject CS 101 30").unwrap();
        assert_eq!(
            command,
            Some(Command::AddSubject {
                department: "CS".to_string(),
                course_number: 101,
                seat_count: 30,
            })
        );
    }

    #[test]
    fn test_parse_enroll_student_case_insensitive() {
        let command = parse_line("  EnrollStudent\tMATH 200   Ada Lovelace").unwrap();
        assert_eq!(
            command,
            Some(Command::EnrollStudent {
                department: "MATH".to_string(),
                course_number: 200,
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            })
        );
    }

    #[test]
    fn test_blank_and_unknown_lines_are_ignored() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   \t ").unwrap(), None);
        assert_eq!(parse_line("dropstudent CS 101 John Doe").unwrap(), None);
        assert_eq!(parse_line("# addsubject CS 101 30").unwrap(), None);
    }

    #[test]
    fn test_extra_tokens_are_ignored() {
        let command = parse_line("addsubject CS 101 30 extra tokens").unwrap();
        assert!(matches!(command, Some(Command::AddSubject { seat_count: 30, .. })));
    }

    #[test]
    fn test_missing_token() {
        let err = parse_line("enrollstudent CS 101 John").unwrap_err();
        assert!(matches!(
            err,
            CommandParseError::MissingToken { token: "lastName", .. }
        ));
    }

    #[test]
    fn test_malformed_integer() {
        let err = parse_line("addsubject CS abc 30").unwrap_err();
        assert!(matches!(
            err,
            CommandParseError::InvalidInteger { token: "courseNumber", .. }
        ));

        let err = parse_line("addsubject CS 101 -5").unwrap_err();
        assert!(matches!(
            err,
            CommandParseError::InvalidInteger { token: "seatCount", .. }
        ));
    }
}
