use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// No output (job result) files were supplied.
    MissingOutputFiles,
    /// The original input file was not supplied.
    MissingInputFile,
    /// Merged output header has no column containing "location".
    UnresolvableLocationColumn { headers: Vec<String> },
    /// Input header is missing one or more of address / city / state.
    UnresolvableAddressSchema { missing: Vec<&'static str> },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (blank failure marker, etc.).
    ConfigValidation(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOutputFiles => write!(f, "at least one output CSV file is required"),
            Self::MissingInputFile => write!(f, "the original input file is required"),
            Self::UnresolvableLocationColumn { headers } => {
                write!(
                    f,
                    "could not find a 'Location' column in output files (headers: {})",
                    if headers.is_empty() { "<none>".to_string() } else { headers.join(", ") }
                )
            }
            Self::UnresolvableAddressSchema { missing } => {
                write!(
                    f,
                    "could not find required address columns in input file (missing: {})",
                    missing.join(", ")
                )
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
