//! Wire format submitted to the Bedrock agent runtime
//!
//! One [`ActionGroupPayload`] is produced per action group. Field names and
//! enum tags match the `InvokeInlineAgent` request shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::FunctionDefinition;

/// Serialized form of one action group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupPayload {
    pub action_group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_group_executor: Option<ActionGroupExecutor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_schema: Option<FunctionSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_schema: Option<ApiSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_action_group_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_action_group_signature_params: Option<Map<String, Value>>,
}

impl ActionGroupPayload {
    pub(crate) fn named(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            action_group_name: name.into(),
            description,
            action_group_executor: None,
            function_schema: None,
            api_schema: None,
            parent_action_group_signature: None,
            parent_action_group_signature_params: None,
        }
    }
}

/// Where the runtime sends invocations of an action group's functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionGroupExecutor {
    /// Hand control back to the caller, which invokes the function in-process
    CustomControl(CustomControl),
    /// Invoke the Lambda function with this ARN
    Lambda(String),
}

impl ActionGroupExecutor {
    pub fn return_control() -> Self {
        Self::CustomControl(CustomControl::ReturnControl)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomControl {
    ReturnControl,
}

/// Function-details schema of an action group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSchema {
    pub functions: Vec<FunctionDefinition>,
}

/// OpenAPI schema of a Lambda-backed action group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiSchema {
    /// Inline OpenAPI document (JSON or YAML text)
    Payload(String),
    /// OpenAPI document stored in S3
    S3(S3Location),
}

impl ApiSchema {
    pub fn payload(document: impl Into<String>) -> Self {
        Self::Payload(document.into())
    }

    pub fn s3(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::S3(S3Location {
            s3_bucket_name: bucket.into(),
            s3_object_key: key.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Location {
    pub s3_bucket_name: String,
    pub s3_object_key: String,
}
