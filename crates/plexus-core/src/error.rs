use std::fmt;

/// Machine-readable error codes for scripts and agents driving the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidEdge,
    EdgeFileUnreadable,
    EdgeFileMalformed,
    ConfigParseError,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidEdge => "E1001",
            Self::EdgeFileUnreadable => "E1002",
            Self::EdgeFileMalformed => "E1003",
            Self::ConfigParseError => "E2001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidEdge => "Malformed edge record",
            Self::EdgeFileUnreadable => "Edge file could not be read",
            Self::EdgeFileMalformed => "Edge file could not be parsed",
            Self::ConfigParseError => "Config file parse error",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidEdge => Some("Each edge must name exactly two rooms (nodes)."),
            Self::EdgeFileUnreadable => Some("Check the path and read permissions."),
            Self::EdgeFileMalformed => {
                Some("Use one `a b` pair per line, or a JSON array of [a, b] pairs.")
            }
            Self::ConfigParseError => Some("Fix syntax in plexus.toml and retry."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
