// Example resolving Lambda ARNs with the caller's real AWS identity
//
// The account id comes from STS GetCallerIdentity and the region from the
// standard AWS configuration chain (AWS_REGION, profile, ...).
//
// Set INLINE_AGENT_IDENTITY_FALLBACK=placeholder to run without credentials;
// the ARN will then use a placeholder account and region.
//
// Run with: cargo run --example sts_lambda_group --features sts

use inline_agent_core::identity::{IdentityPolicy, StsIdentityProvider};
use inline_agent_core::{ActionGroup, ActionGroups, ApiSchema, ExecutorResolver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let group = ActionGroup::builder("HotelReservations")
        .description("Search and book hotel rooms")
        .lambda("HotelReservationsFn")
        .api_schema(ApiSchema::s3("agent-schemas", "hotel/openapi.yaml"))
        .build()?;
    let groups = ActionGroups::new([group])?;

    let resolver = ExecutorResolver::new(StsIdentityProvider::from_env().await)
        .with_identity_policy(IdentityPolicy::from_env());

    match groups.serialize(&resolver).await {
        Ok(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
        Err(e) if e.is_identity() => {
            eprintln!("Could not resolve the Lambda ARN: {}", e);
            eprintln!(
                "Configure AWS credentials or set INLINE_AGENT_IDENTITY_FALLBACK=placeholder"
            );
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
