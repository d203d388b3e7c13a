//! Types for the converter module.

use std::path::PathBuf;

/// One conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub job_id: String,
    /// Uploaded score.
    pub input_path: PathBuf,
    /// Job directory the movements are exported into.
    pub output_dir: PathBuf,
}

/// How the converter process ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionExit {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Last lines of combined stdout/stderr.
    pub output_tail: Vec<String>,
}

impl ConversionExit {
    pub fn from_code(code: i32) -> Self {
        Self {
            code: Some(code),
            output_tail: Vec::new(),
        }
    }

    pub fn success() -> Self {
        Self::from_code(0)
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human readable description of an unclean exit, `None` on success.
    pub fn error_detail(&self) -> Option<String> {
        match self.code {
            Some(0) => None,
            Some(code) => Some(format!("exit status {}", code)),
            None => Some("terminated by signal".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_detail() {
        let exit = ConversionExit::success();
        assert!(exit.is_success());
        assert_eq!(exit.error_detail(), None);
    }

    #[test]
    fn test_non_zero_exit_detail() {
        let exit = ConversionExit::from_code(2);
        assert!(!exit.is_success());
        assert_eq!(exit.error_detail().as_deref(), Some("exit status 2"));
    }

    #[test]
    fn test_signal_exit_detail() {
        let exit = ConversionExit::default();
        assert!(!exit.is_success());
        assert_eq!(exit.error_detail().as_deref(), Some("terminated by signal"));
    }
}
