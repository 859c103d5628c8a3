use super::EntryPoint;

pub type SpecFunResult<T> = Result<T, SpecFunError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Success,
    DomainError,
    Overflow,
    Underflow,
    Fault,
}

impl ErrorCategory {
    pub const fn status_placeholder(self) -> StatusPlaceholder {
        match self {
            Self::Success => StatusPlaceholder {
                status_code: 0,
                exit_code: 0,
                rust_category: "Success",
                status_label: "SUCCESS",
            },
            Self::DomainError => StatusPlaceholder {
                status_code: 1,
                exit_code: 2,
                rust_category: "DomainError",
                status_label: "EDOM",
            },
            Self::Fault => StatusPlaceholder {
                status_code: 3,
                exit_code: 5,
                rust_category: "Fault",
                status_label: "EFAULT",
            },
            Self::Underflow => StatusPlaceholder {
                status_code: 15,
                exit_code: 4,
                rust_category: "Underflow",
                status_label: "EUNDRFLW",
            },
            Self::Overflow => StatusPlaceholder {
                status_code: 16,
                exit_code: 4,
                rust_category: "Overflow",
                status_label: "EOVRFLW",
            },
        }
    }

    pub const fn status_code(self) -> i32 {
        self.status_placeholder().status_code
    }

    pub const fn exit_code(self) -> i32 {
        self.status_placeholder().exit_code
    }

    pub const fn rust_category(self) -> &'static str {
        self.status_placeholder().rust_category
    }

    pub const fn status_label(self) -> &'static str {
        self.status_placeholder().status_label
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPlaceholder {
    pub status_code: i32,
    pub exit_code: i32,
    pub rust_category: &'static str,
    pub status_label: &'static str,
}

/// Failure of a special-function evaluation.
///
/// Physically forbidden inputs are not errors; they evaluate to an exact zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpecFunError {
    #[error("{entry}: domain error, {reason}")]
    Domain {
        entry: EntryPoint,
        reason: &'static str,
    },
    #[error("{entry}: overflow, {reason}")]
    Overflow {
        entry: EntryPoint,
        reason: &'static str,
    },
    #[error("{entry}: underflow, {reason}")]
    Underflow {
        entry: EntryPoint,
        reason: &'static str,
    },
    #[error("{entry}: output buffer holds {provided} values but {required} are required")]
    BufferTooSmall {
        entry: EntryPoint,
        required: usize,
        provided: usize,
    },
}

impl SpecFunError {
    pub const fn domain(entry: EntryPoint, reason: &'static str) -> Self {
        Self::Domain { entry, reason }
    }

    pub const fn overflow(entry: EntryPoint, reason: &'static str) -> Self {
        Self::Overflow { entry, reason }
    }

    pub const fn underflow(entry: EntryPoint, reason: &'static str) -> Self {
        Self::Underflow { entry, reason }
    }

    pub const fn buffer_too_small(entry: EntryPoint, required: usize, provided: usize) -> Self {
        Self::BufferTooSmall {
            entry,
            required,
            provided,
        }
    }

    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain { .. } => ErrorCategory::DomainError,
            Self::Overflow { .. } => ErrorCategory::Overflow,
            Self::Underflow { .. } => ErrorCategory::Underflow,
            Self::BufferTooSmall { .. } => ErrorCategory::Fault,
        }
    }

    pub const fn entry(&self) -> EntryPoint {
        match self {
            Self::Domain { entry, .. }
            | Self::Overflow { entry, .. }
            | Self::Underflow { entry, .. }
            | Self::BufferTooSmall { entry, .. } => *entry,
        }
    }

    pub const fn status_code(&self) -> i32 {
        self.category().status_code()
    }

    pub const fn status_label(&self) -> &'static str {
        self.category().status_label()
    }

    pub const fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.status_label(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCategory, SpecFunError};
    use crate::domain::EntryPoint;

    #[test]
    fn status_mapping_is_stable() {
        let cases = [
            (ErrorCategory::Success, 0, 0, "Success", "SUCCESS"),
            (ErrorCategory::DomainError, 1, 2, "DomainError", "EDOM"),
            (ErrorCategory::Fault, 3, 5, "Fault", "EFAULT"),
            (ErrorCategory::Underflow, 15, 4, "Underflow", "EUNDRFLW"),
            (ErrorCategory::Overflow, 16, 4, "Overflow", "EOVRFLW"),
        ];

        for (category, status_code, exit_code, rust_category, status_label) in cases {
            let placeholder = category.status_placeholder();
            assert_eq!(placeholder.status_code, status_code);
            assert_eq!(placeholder.exit_code, exit_code);
            assert_eq!(placeholder.rust_category, rust_category);
            assert_eq!(placeholder.status_label, status_label);
        }
        assert!(!ErrorCategory::Success.is_fatal());
        assert!(ErrorCategory::Overflow.is_fatal());
    }

    #[test]
    fn errors_render_diagnostic_lines() {
        let error = SpecFunError::domain(EntryPoint::LegendrePl, "x must lie in [-1, 1]");
        assert_eq!(error.category(), ErrorCategory::DomainError);
        assert_eq!(error.entry(), EntryPoint::LegendrePl);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [EDOM] legendre_pl: domain error, x must lie in [-1, 1]"
        );

        let fault = SpecFunError::buffer_too_small(EntryPoint::LegendrePlmArray, 4, 2);
        assert_eq!(fault.status_code(), 3);
        assert_eq!(
            fault.to_string(),
            "legendre_plm_array: output buffer holds 2 values but 4 are required"
        );
    }
}
