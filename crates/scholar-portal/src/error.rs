use crate::config::ConfigError;
use crate::dashboard::DashboardError;
use crate::domain::DocumentError;
use crate::forms::ValidationReport;
use crate::login::LoginError;
use crate::registration::RegistrationError;
use crate::session::SessionError;
use crate::telemetry::TelemetryError;
use crate::transport::TransportError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Transport(TransportError),
    Document(DocumentError),
    Session(SessionError),
    Validation(ValidationReport),
    Registration(RegistrationError),
    Login(LoginError),
    Dashboard(DashboardError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Transport(err) => write!(f, "transport error: {}", err),
            AppError::Document(err) => write!(f, "document error: {}", err),
            AppError::Session(err) => write!(f, "session error: {}", err),
            AppError::Validation(report) => write!(f, "invalid input: {}", report),
            AppError::Registration(err) => write!(f, "registration failed: {}", err),
            AppError::Login(err) => write!(f, "sign-in failed: {}", err),
            AppError::Dashboard(err) => write!(f, "dashboard unavailable: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Transport(err) => Some(err),
            AppError::Document(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Validation(report) => Some(report),
            AppError::Registration(err) => Some(err),
            AppError::Login(err) => Some(err),
            AppError::Dashboard(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<TransportError> for AppError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<DocumentError> for AppError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<ValidationReport> for AppError {
    fn from(value: ValidationReport) -> Self {
        Self::Validation(value)
    }
}

impl From<RegistrationError> for AppError {
    fn from(value: RegistrationError) -> Self {
        Self::Registration(value)
    }
}

impl From<LoginError> for AppError {
    fn from(value: LoginError) -> Self {
        Self::Login(value)
    }
}

impl From<DashboardError> for AppError {
    fn from(value: DashboardError) -> Self {
        Self::Dashboard(value)
    }
}
