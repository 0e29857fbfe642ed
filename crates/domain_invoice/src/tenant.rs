//! Tenant registrations and the admin registration form
//!
//! Registrations are managed by the app provider's admin. The fields that
//! are required depend on the backend's authentication mode, which the
//! client learns from the feature flags.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use core_kernel::{PartyId, TenantId};

use crate::error::InvoiceError;

/// Backend authentication mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthMode {
    #[serde(rename = "oauth2")]
    OAuth2,
    #[serde(rename = "shared-secret")]
    SharedSecret,
}

/// Backend feature flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub auth_mode: AuthMode,
}

/// A registered tenant as returned by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantRegistration {
    pub tenant_id: TenantId,
    pub party_id: PartyId,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub issuer_url: Option<String>,
    #[serde(default)]
    pub wallet_url: Option<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub internal: bool,
}

impl TenantRegistration {
    /// Internal registrations are provisioned with the deployment and
    /// cannot be removed from the client
    pub fn can_delete(&self) -> bool {
        !self.internal
    }
}

/// Payload for creating a tenant registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TenantRegistrationRequest {
    #[validate(length(min = 1, message = "Tenant ID is required"))]
    pub tenant_id: String,
    #[validate(length(min = 1, message = "Party ID is required"))]
    pub party_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_url: Option<String>,
    #[serde(default)]
    pub users: Vec<String>,
}

/// The registration form as typed by the admin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantRegistrationForm {
    pub tenant_id: String,
    pub party_id: String,
    pub client_id: String,
    pub issuer_url: String,
    pub wallet_url: String,
    /// Comma-separated user names
    pub users: String,
}

impl TenantRegistrationForm {
    /// Validates the form and builds the request
    ///
    /// `auth_mode` is `None` while the feature flags are unknown; only the
    /// mode-independent checks apply then. The first failing rule wins.
    pub fn validate_for(
        &self,
        auth_mode: Option<AuthMode>,
    ) -> Result<TenantRegistrationRequest, InvoiceError> {
        let request = TenantRegistrationRequest {
            tenant_id: self.tenant_id.trim().to_string(),
            party_id: self.party_id.trim().to_string(),
            client_id: non_blank(&self.client_id),
            issuer_url: non_blank(&self.issuer_url),
            wallet_url: non_blank(&self.wallet_url),
            users: parse_users(&self.users),
        };

        if let Err(errors) = request.validate() {
            return Err(first_message(&errors, &["tenant_id", "party_id"])
                .map(InvoiceError::MissingField)
                .unwrap_or_else(|| errors.into()));
        }

        match auth_mode {
            Some(AuthMode::OAuth2) => {
                if request.client_id.is_none() {
                    return Err(InvoiceError::missing("Client ID is required (OAuth2)"));
                }
                if request.issuer_url.is_none() {
                    return Err(InvoiceError::missing("Issuer URL is required (OAuth2)"));
                }
            }
            Some(AuthMode::SharedSecret) => {
                if request.users.is_empty() {
                    return Err(InvoiceError::missing(
                        "At least one user is required (Shared Secret)",
                    ));
                }
            }
            None => {}
        }

        Ok(request)
    }
}

/// Splits a comma-separated user list, trimming each name and dropping blanks
pub fn parse_users(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|user| !user.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn first_message(errors: &ValidationErrors, order: &[&str]) -> Option<String> {
    let fields = errors.field_errors();
    order.iter().find_map(|wanted| {
        fields
            .iter()
            .find(|(name, _)| {
                let name: &str = name;
                name == *wanted
            })
            .and_then(|(_, field_errors)| field_errors.first())
            .and_then(|error| error.message.as_ref().map(|message| message.to_string()))
    })
}
