use async_trait::async_trait;
use reqwest::StatusCode;

use core_kernel::PortError;
use domain_invoice::{AuthenticatedUser, PartyDirectory, SessionPort};

use super::HttpLedgerAdapter;

#[async_trait]
impl SessionPort for HttpLedgerAdapter {
    async fn current_user(&self) -> Result<Option<AuthenticatedUser>, PortError> {
        match self.client.get("/user").await {
            Ok(user) => Ok(Some(user)),
            // nobody logged in
            Err(error)
                if error.is_status(StatusCode::UNAUTHORIZED)
                    || error.is_status(StatusCode::NOT_FOUND) =>
            {
                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn parties(&self) -> Result<PartyDirectory, PortError> {
        Ok(self.client.get("/parties").await?)
    }
}
