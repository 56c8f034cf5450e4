//! Executor resolution
//!
//! [`Executor`] is derived from an action group's capability source and never
//! stored. [`ExecutorResolver`] turns it into the wire executor, looking up
//! the caller's identity for Lambda ARNs at most once.

use std::fmt;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::action_group::{ActionGroup, CapabilitySource};
use crate::identity::{Identity, IdentityError, IdentityPolicy, IdentityProvider};
use crate::wire::ActionGroupExecutor;

/// How an action group's capabilities are invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Executor {
    /// Called in-process by the caller (tools and MCP servers)
    DirectInvoke,
    /// Invoked by the runtime through a Lambda function
    RemoteFunction,
    /// Provided by the platform itself
    PlatformBuiltin,
}

impl Executor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectInvoke => "DIRECT_INVOKE",
            Self::RemoteFunction => "REMOTE_FUNCTION",
            Self::PlatformBuiltin => "PLATFORM_BUILTIN",
        }
    }

    /// Whether the caller invokes these capabilities locally
    pub fn is_local(&self) -> bool {
        matches!(self, Self::DirectInvoke)
    }
}

impl fmt::Display for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves action groups to wire executors.
///
/// The identity is fetched from the provider on the first Lambda group and
/// reused for the resolver's lifetime. Failed lookups are not cached, so a
/// strict resolver retries on the next call.
///
/// ```rust
/// use inline_agent_core::identity::{IdentityPolicy, StaticIdentityProvider};
/// use inline_agent_core::ExecutorResolver;
///
/// let resolver = ExecutorResolver::new(StaticIdentityProvider::placeholder())
///     .with_identity_policy(IdentityPolicy::Strict);
/// assert_eq!(resolver.policy(), IdentityPolicy::Strict);
/// ```
pub struct ExecutorResolver {
    provider: Arc<dyn IdentityProvider>,
    policy: IdentityPolicy,
    identity: OnceCell<Identity>,
}

impl ExecutorResolver {
    pub fn new(provider: impl IdentityProvider + 'static) -> Self {
        Self::from_arc(Arc::new(provider))
    }

    /// Share a provider with other resolvers
    pub fn from_arc(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            policy: IdentityPolicy::default(),
            identity: OnceCell::new(),
        }
    }

    pub fn with_identity_policy(mut self, policy: IdentityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> IdentityPolicy {
        self.policy
    }

    /// The caller's identity, looked up on first use
    pub async fn identity(&self) -> Result<&Identity, IdentityError> {
        self.identity
            .get_or_try_init(|| async {
                match self.provider.identity().await {
                    Ok(identity) => Ok(identity),
                    Err(e) if self.policy == IdentityPolicy::PlaceholderOnFailure => {
                        log::warn!(
                            "identity lookup failed ({}); using placeholder account {} in {}",
                            e,
                            crate::identity::PLACEHOLDER_ACCOUNT_ID,
                            crate::identity::PLACEHOLDER_REGION
                        );
                        Ok(Identity::placeholder())
                    }
                    Err(e) => Err(e),
                }
            })
            .await
    }

    /// Fully-qualified ARN for a Lambda function name.
    ///
    /// Names that are already ARNs are returned unchanged without an
    /// identity lookup.
    pub async fn lambda_arn(&self, lambda_name: &str) -> Result<String, IdentityError> {
        if lambda_name.starts_with("arn:") {
            return Ok(lambda_name.to_string());
        }
        Ok(self.identity().await?.lambda_arn(lambda_name))
    }

    /// Wire executor for a group; `None` for built-in groups, which have none
    pub async fn resolve(
        &self,
        group: &ActionGroup,
    ) -> Result<Option<ActionGroupExecutor>, IdentityError> {
        let executor = match group.source() {
            CapabilitySource::Tools { .. } | CapabilitySource::Mcp { .. } => {
                Some(ActionGroupExecutor::return_control())
            }
            CapabilitySource::Lambda { lambda_name, .. } => {
                let arn = self.lambda_arn(lambda_name).await?;
                Some(ActionGroupExecutor::Lambda(arn))
            }
            CapabilitySource::Builtin(_) => None,
        };

        log::debug!(
            "resolved action group '{}' as {}",
            group.name(),
            group.executor()
        );
        Ok(executor)
    }
}

impl fmt::Debug for ExecutorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorResolver")
            .field("policy", &self.policy)
            .field("identity", &self.identity.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_group::BuiltinTool;
    use crate::identity::StaticIdentityProvider;
    use crate::schema::FunctionDefinition;
    use crate::test_utils::MockIdentityProvider;

    fn lambda_group(lambda_name: &str) -> ActionGroup {
        ActionGroup::builder("Hotel")
            .lambda(lambda_name)
            .function(FunctionDefinition::new("book_room", "Book a room"))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_lambda_arn_from_identity() {
        let identity = Identity::new("111122223333", "eu-west-1");
        let resolver = ExecutorResolver::new(StaticIdentityProvider::new(identity));

        let executor = resolver.resolve(&lambda_group("HotelFn")).await.unwrap();
        assert_eq!(
            executor,
            Some(ActionGroupExecutor::Lambda(
                "arn:aws:lambda:eu-west-1:111122223333:function:HotelFn".into()
            ))
        );
    }

    #[tokio::test]
    async fn test_full_arn_skips_lookup() {
        let provider = MockIdentityProvider::failing("no credentials");
        let resolver = ExecutorResolver::new(provider.clone());

        let arn = "arn:aws:lambda:us-west-2:999999999999:function:Existing";
        assert_eq!(resolver.lambda_arn(arn).await.unwrap(), arn);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_strict_policy_propagates_failure() {
        let resolver = ExecutorResolver::new(MockIdentityProvider::failing("no credentials"));

        let group = lambda_group("HotelFn");
        let err = resolver.resolve(&group).await.unwrap_err();
        assert_eq!(err, IdentityError::Unavailable("no credentials".into()));
    }

    #[tokio::test]
    async fn test_placeholder_policy_substitutes_identity() {
        let resolver = ExecutorResolver::new(MockIdentityProvider::failing("no credentials"))
            .with_identity_policy(IdentityPolicy::PlaceholderOnFailure);

        let executor = resolver.resolve(&lambda_group("HotelFn")).await.unwrap();
        assert_eq!(
            executor,
            Some(ActionGroupExecutor::Lambda(
                "arn:aws:lambda:us-east-1:123456789012:function:HotelFn".into()
            ))
        );
    }

    #[tokio::test]
    async fn test_identity_is_cached() {
        let provider = MockIdentityProvider::new(Identity::new("1", "ap-south-1"));
        let resolver = ExecutorResolver::new(provider.clone());

        for name in ["A", "B", "C"] {
            resolver.lambda_arn(name).await.unwrap();
        }
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_retried() {
        let provider = MockIdentityProvider::failing("throttled");
        let resolver = ExecutorResolver::new(provider.clone());

        tokio_test::assert_err!(resolver.lambda_arn("A").await);
        tokio_test::assert_err!(resolver.lambda_arn("A").await);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_non_lambda_groups_need_no_identity() {
        let provider = MockIdentityProvider::failing("no credentials");
        let resolver = ExecutorResolver::new(provider.clone());

        let builtin = ActionGroup::builder("UserInput")
            .builtin(BuiltinTool::user_input())
            .build()
            .unwrap();
        assert_eq!(resolver.resolve(&builtin).await.unwrap(), None);
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_executor_tags() {
        assert_eq!(Executor::DirectInvoke.to_string(), "DIRECT_INVOKE");
        assert_eq!(Executor::RemoteFunction.as_str(), "REMOTE_FUNCTION");
        assert!(Executor::DirectInvoke.is_local());
        assert!(!Executor::PlatformBuiltin.is_local());
    }
}
