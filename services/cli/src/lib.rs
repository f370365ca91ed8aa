mod cli;
mod terminal;

use scholar_portal::dashboard::DashboardError;
use scholar_portal::error::AppError;
use scholar_portal::login::LoginError;
use scholar_portal::registration::RegistrationError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

/// Failures whose message the terminal status sink has already printed.
pub fn already_reported(err: &AppError) -> bool {
    matches!(
        err,
        AppError::Registration(RegistrationError::Step { .. })
            | AppError::Login(LoginError::Failed { .. })
            | AppError::Dashboard(DashboardError::Failed { .. })
    )
}
