use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::auth::session::Session;
use crate::error::{ClientError, Result};
use crate::model::employee::MIN_PASSWORD_LEN;
use crate::models::{Ack, ChangePasswordReq, LoginReqDto, LoginResponse, ResetPasswordReq};
use crate::routes;

/// Checks a new password and its confirmation before anything is sent.
pub fn check_new_password(new_password: &str, confirm: &str) -> Result<()> {
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::Rejected(format!(
            "New password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if new_password != confirm {
        return Err(ClientError::Rejected("Passwords do not match".into()));
    }
    Ok(())
}

impl ApiClient {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::Rejected(
                "Email and password must not be empty".into(),
            ));
        }

        let body: LoginResponse = self
            .post(routes::LOGIN, &LoginReqDto { email, password })
            .await?;
        Ok(Session { token: body.token, employee: body.employee })
    }

    /// Logs in and keeps the returned token for every later call.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let session = self.authenticate(email, password).await?;
        self.session().set(session.clone())?;
        info!(employee_id = %session.employee.id, role = %session.role(), "Logged in");
        Ok(session)
    }

    /// Like [`ApiClient::login`], but a non-admin account is refused and
    /// its token is never stored.
    #[instrument(skip(self, password))]
    pub async fn login_admin(&self, email: &str, password: &str) -> Result<Session> {
        let session = self.authenticate(email, password).await?;
        if !session.role().is_admin() {
            warn!(employee_id = %session.employee.id, "Admin login refused");
            return Err(ClientError::Forbidden(
                "Access denied. Admin privileges required.".into(),
            ));
        }

        self.session().set(session.clone())?;
        info!(employee_id = %session.employee.id, "Admin logged in");
        Ok(session)
    }

    /// Local only; the backend keeps no session state.
    pub fn logout(&self) {
        self.session().clear();
        info!("Logged out");
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm: &str,
    ) -> Result<()> {
        self.session().require_login()?;
        check_new_password(new_password, confirm)?;

        let _: Ack = self
            .put(
                routes::CHANGE_PASSWORD,
                &ChangePasswordReq { current_password, new_password },
            )
            .await?;
        info!("Password changed");
        Ok(())
    }

    pub async fn reset_password(
        &self,
        employee_id: &str,
        new_password: &str,
        confirm: &str,
    ) -> Result<()> {
        self.session().require_admin()?;
        check_new_password(new_password, confirm)?;

        let _: Ack = self
            .put(
                &routes::reset_password(employee_id),
                &ResetPasswordReq { new_password },
            )
            .await?;
        info!(employee_id, "Password reset");
        Ok(())
    }
}
