//! Exit code constants for cascade.
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Command completed; report is compliant |
//! | 1 | `NON_COMPLIANT` | Compliance report is invalid |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `INTERNAL` | Unexpected failure |

/// Exit codes matching the documented exit code table.
///
/// ```rust
/// use cascade_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::NON_COMPLIANT.as_i32(), 1);
/// assert_eq!(ExitCode::SUCCESS, ExitCode::from_i32(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - command completed and the report (if any) is valid
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Non-compliant - the compliance report has at least one invalid phase
    pub const NON_COMPLIANT: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Internal error - unexpected failure
    pub const INTERNAL: ExitCode = ExitCode(3);

    /// Get the numeric exit code value for `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values_are_stable() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::NON_COMPLIANT.as_i32(), 1);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::INTERNAL.as_i32(), 3);
        assert_eq!(i32::from(ExitCode::CLI_ARGS), 2);
    }
}
