//! Blebridge errors

use num_enum::TryFromPrimitive;

/// The error type for bridge operations
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    message: String,
}

impl Error {
    pub(crate) fn new(
        kind: ErrorKind,
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
        message: String,
    ) -> Self {
        Error { kind, source, message }
    }

    /// Returns the corresponding [ErrorKind] for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message for this error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.message.is_empty(), &self.source) {
            (true, None) => write!(f, "{}", &self.kind),
            (false, None) => write!(f, "{}: {}", &self.kind, &self.message),
            (true, Some(err)) => write!(f, "{}: {}", &self.kind, err),
            (false, Some(err)) => write!(f, "{}: {} ({})", &self.kind, &self.message, err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|x| {
            let x: &(dyn std::error::Error + 'static) = &**x;
            x
        })
    }
}

/// A list of general categories of bridge error.
#[non_exhaustive]
#[derive(Debug, displaydoc::Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// the Bluetooth adapter is not available
    AdapterUnavailable,
    /// permission denied
    NotAuthorized,
    /// the request is not implemented
    NotImplemented,
    /// an internal error has occured
    Internal,
    /// error
    Other,
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error {
            kind,
            source: None,
            message: String::new(),
        }
    }
}

/// Discovery failure codes reported by the platform scanner when a scan cannot be started or
/// continued.
#[repr(i32)]
#[derive(Debug, displaydoc::Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive)]
pub enum ScanFailureCode {
    /// A scan with the same settings is already started by the application.
    AlreadyStarted = 1,
    /// The application could not be registered with the scanner.
    ApplicationRegistrationFailed = 2,
    /// An internal scanner error occurred.
    InternalError = 3,
    /// Scanning is not supported by this hardware.
    FeatureUnsupported = 4,
    /// The scanner is out of hardware resources.
    OutOfHardwareResources = 5,
    /// Scanning was started too frequently.
    ScanningTooFrequently = 6,
}

/// A discovery failure reported by the adapter mid-session.
#[derive(Debug, displaydoc::Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScanFailure {
    /// {0}
    Known(ScanFailureCode),
    /// unknown scan failure: {0}
    Unknown(i32),
}

impl ScanFailure {
    /// The raw failure code as delivered by the platform.
    pub fn code(&self) -> i32 {
        match self {
            ScanFailure::Known(code) => *code as i32,
            ScanFailure::Unknown(code) => *code,
        }
    }
}

impl From<i32> for ScanFailure {
    fn from(number: i32) -> Self {
        match ScanFailureCode::try_from(number) {
            Ok(code) => ScanFailure::Known(code),
            Err(_) => ScanFailure::Unknown(number),
        }
    }
}
