//! Account and region lookup for Lambda ARNs
//!
//! Lambda-backed action groups are serialized with a fully-qualified function
//! ARN, which needs the caller's account id and region. An
//! [`IdentityProvider`] supplies them; [`IdentityPolicy`] decides what happens
//! when it cannot.

use thiserror::Error;

/// Account id used when [`IdentityPolicy::PlaceholderOnFailure`] applies
pub const PLACEHOLDER_ACCOUNT_ID: &str = "123456789012";

/// Region used when [`IdentityPolicy::PlaceholderOnFailure`] applies
pub const PLACEHOLDER_REGION: &str = "us-east-1";

/// Environment variable read by [`IdentityPolicy::from_env`]
pub const IDENTITY_FALLBACK_ENV: &str = "INLINE_AGENT_IDENTITY_FALLBACK";

/// Errors from identity lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The lookup call failed (no credentials, network, access denied, ...)
    #[error("identity lookup failed: {0}")]
    Unavailable(String),

    /// The lookup succeeded but a field was missing
    #[error("identity lookup returned no {0}")]
    Incomplete(&'static str),
}

/// The account and region ARNs are built for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub account_id: String,
    pub region: String,
}

impl Identity {
    pub fn new(account_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
        }
    }

    /// Fixed identity for tests and offline use
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_ACCOUNT_ID, PLACEHOLDER_REGION)
    }

    /// ARN of a Lambda function in this account and region
    pub fn lambda_arn(&self, function_name: &str) -> String {
        format!(
            "arn:aws:lambda:{}:{}:function:{}",
            self.region, self.account_id, function_name
        )
    }
}

/// Source of the caller's account id and region
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn identity(&self) -> Result<Identity, IdentityError>;
}

/// Provider that always returns the same identity
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    identity: Identity,
}

impl StaticIdentityProvider {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn placeholder() -> Self {
        Self::new(Identity::placeholder())
    }
}

#[async_trait::async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn identity(&self) -> Result<Identity, IdentityError> {
        Ok(self.identity.clone())
    }
}

/// What to do when the identity lookup fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityPolicy {
    /// Propagate the failure
    #[default]
    Strict,
    /// Substitute [`Identity::placeholder`] and log a warning.
    ///
    /// Intended for tests and offline runs only: in production a credentials
    /// problem would otherwise surface as an ARN in the wrong account.
    PlaceholderOnFailure,
}

impl IdentityPolicy {
    /// Read the policy from `INLINE_AGENT_IDENTITY_FALLBACK`.
    ///
    /// Only the value `placeholder` selects [`IdentityPolicy::PlaceholderOnFailure`].
    pub fn from_env() -> Self {
        std::env::var(IDENTITY_FALLBACK_ENV)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    /// Parse a policy name; unknown values are `Strict`.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("placeholder") {
            Self::PlaceholderOnFailure
        } else {
            Self::Strict
        }
    }
}

#[cfg(feature = "sts")]
pub use sts::StsIdentityProvider;

#[cfg(feature = "sts")]
mod sts {
    use super::{Identity, IdentityError, IdentityProvider};
    use aws_sdk_sts::error::DisplayErrorContext;
    use aws_sdk_sts::Client;

    /// Identity from STS `GetCallerIdentity` and the loaded SDK region
    #[derive(Debug, Clone)]
    pub struct StsIdentityProvider {
        client: Client,
        region: Option<String>,
    }

    impl StsIdentityProvider {
        /// Load AWS configuration from the environment (via aws-config)
        pub async fn from_env() -> Self {
            let sdk_config = aws_config::load_from_env().await;
            Self::new(&sdk_config)
        }

        /// Build from an already loaded SDK configuration
        pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
            Self {
                client: Client::new(sdk_config),
                region: sdk_config.region().map(|region| region.to_string()),
            }
        }
    }

    #[async_trait::async_trait]
    impl IdentityProvider for StsIdentityProvider {
        async fn identity(&self) -> Result<Identity, IdentityError> {
            let Some(region) = self.region.clone() else {
                return Err(IdentityError::Incomplete("region"));
            };

            let output = self
                .client
                .get_caller_identity()
                .send()
                .await
                .map_err(|e| {
                    IdentityError::Unavailable(DisplayErrorContext(&e).to_string())
                })?;

            let account_id = output
                .account()
                .ok_or(IdentityError::Incomplete("account id"))?;

            Ok(Identity::new(account_id, region))
        }
    }
}
