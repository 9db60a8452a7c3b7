//! "Signed-off-by" policy: every commit message must carry a sign-off line

use crate::error::Result;
use crate::github::{CheckResult, Commit};
use crate::hooks::PolicyCheck;

const CONTEXT: &str = "Signed-off-by checker";
const SIGNOFF_PREFIX: &str = "Signed-off-by:";
const FAILURE_MESSAGE: &str = "Commit message must be signed off";

/// Passes a commit when any line of its message, after stripping leading
/// whitespace, starts with the literal `Signed-off-by:` (case-sensitive).
#[derive(Debug, Clone, Copy, Default)]
pub struct SignoffCheck;

impl PolicyCheck for SignoffCheck {
    fn name(&self) -> &str {
        CONTEXT
    }

    fn check(&self, commit: &Commit) -> Result<CheckResult> {
        let signed_off = commit
            .message()
            .lines()
            .any(|line| line.trim_start().starts_with(SIGNOFF_PREFIX));

        if signed_off {
            Ok(CheckResult::success(CONTEXT))
        } else {
            Ok(CheckResult::failure(CONTEXT, FAILURE_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::CheckState;
    use pretty_assertions::assert_eq;

    fn check(message: &str) -> CheckResult {
        SignoffCheck.check(&Commit::new("abc123", message)).unwrap()
    }

    #[test]
    fn passes_message_with_signoff_line() {
        let result = check("fix bug\n\nSigned-off-by: A <a@example.com>");
        assert_eq!(result.state, CheckState::Success);
        assert_eq!(result.context, "Signed-off-by checker");
        assert_eq!(result.message, None);
    }

    #[test]
    fn passes_signoff_with_leading_whitespace() {
        let result = check("fix bug\n\n   Signed-off-by: A <a@example.com>");
        assert_eq!(result.state, CheckState::Success);
    }

    #[test]
    fn passes_single_line_signoff() {
        let result = check("Signed-off-by: A <a@example.com>");
        assert_eq!(result.state, CheckState::Success);
    }

    #[test]
    fn fails_message_without_signoff() {
        let result = check("fix bug");
        assert_eq!(result.state, CheckState::Failure);
        assert_eq!(
            result.message.as_deref(),
            Some("Commit message must be signed off")
        );
    }

    #[test]
    fn signoff_token_is_case_sensitive() {
        let result = check("fix bug\n\nsigned-off-by: A <a@example.com>");
        assert_eq!(result.state, CheckState::Failure);
    }

    #[test]
    fn signoff_in_the_middle_of_a_line_does_not_count() {
        let result = check("fix bug, Signed-off-by: A <a@example.com>");
        assert_eq!(result.state, CheckState::Failure);
    }

    #[test]
    fn check_is_idempotent() {
        let commit = Commit::new("abc123", "fix bug");
        let first = SignoffCheck.check(&commit).unwrap();
        let second = SignoffCheck.check(&commit).unwrap();
        assert_eq!(first, second);
    }
}
