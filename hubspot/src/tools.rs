//! CRM tool handlers: search, get, create, update and associations over
//! contacts, companies and deals.
//!
//! Every handler returns `Ok(Value)`. Validation problems and HTTP failures
//! are reported in-band as `{"error": "..."}` so batch callers can keep
//! going; only missing credentials and transport failures are `Err`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::client::HubSpotClient;
use crate::credentials::CredentialStore;
use crate::error::{HubSpotError, Result};
use crate::objects::ObjectType;

pub const DEFAULT_SEARCH_LIMIT: i64 = 10;
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Name and description of a dispatchable tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
}

pub const TOOLS: &[ToolDefinition] = &[
    ToolDefinition {
        name: "hubspot_search",
        description: "Search HubSpot CRM objects (contacts, companies, or deals).",
    },
    ToolDefinition {
        name: "hubspot_get",
        description: "Get a single HubSpot CRM object by ID.",
    },
    ToolDefinition {
        name: "hubspot_create",
        description: "Create a new HubSpot CRM object.",
    },
    ToolDefinition {
        name: "hubspot_update",
        description: "Update an existing HubSpot CRM object.",
    },
    ToolDefinition {
        name: "hubspot_get_associations",
        description: "Get associations between HubSpot objects.",
    },
];

fn default_limit() -> i64 {
    DEFAULT_SEARCH_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct SearchArgs {
    pub object_type: ObjectType,
    pub query: String,
    #[serde(default)]
    pub properties: Option<Vec<String>>,
    /// Signed so out-of-range values reach the range check
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct GetArgs {
    pub object_type: ObjectType,
    pub object_id: String,
    #[serde(default)]
    pub properties: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateArgs {
    pub object_type: ObjectType,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArgs {
    pub object_type: ObjectType,
    pub object_id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct AssociationArgs {
    pub from_object_type: ObjectType,
    pub from_object_id: String,
    pub to_object_type: ObjectType,
}

/// HubSpot CRM tool handlers
#[derive(Debug, Clone)]
pub struct HubSpotTools {
    client: HubSpotClient,
}

impl HubSpotTools {
    /// `api_key` is the fallback used when `credentials` holds no OAuth2 token
    pub fn new(credentials: Option<Arc<dyn CredentialStore>>, api_key: Option<String>) -> Result<Self> {
        Ok(Self::with_client(HubSpotClient::new(credentials, api_key)?))
    }

    pub fn with_client(client: HubSpotClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HubSpotClient {
        &self.client
    }

    /// Search objects of one type. `limit` must be within 1..=100.
    pub async fn search(
        &self,
        object_type: ObjectType,
        query: &str,
        properties: Option<&[String]>,
        limit: i64,
    ) -> Result<Value> {
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Ok(json!({ "error": "limit must be between 1 and 100" }));
        }

        let properties: Vec<String> = match properties {
            Some(props) if !props.is_empty() => props.to_vec(),
            _ => object_type
                .default_properties()
                .iter()
                .map(|p| p.to_string())
                .collect(),
        };

        let body = json!({
            "query": query,
            "limit": limit,
            "properties": properties,
        });

        let result = self
            .client
            .post(&format!("/crm/v3/objects/{}/search", object_type), &body)
            .await?;

        if result.get("error").is_some() {
            return Ok(result);
        }

        Ok(json!({
            "object_type": object_type,
            "query": query,
            "total": result.get("total").cloned().unwrap_or(json!(0)),
            "results": result.get("results").cloned().unwrap_or(json!([])),
        }))
    }

    /// Fetch one object; `properties` become a comma-joined query parameter
    pub async fn get(&self, object_type: ObjectType, object_id: &str, properties: Option<&[String]>) -> Result<Value> {
        let params: Vec<(&str, String)> = match properties {
            Some(props) if !props.is_empty() => vec![("properties", props.join(","))],
            _ => Vec::new(),
        };

        let endpoint = format!("/crm/v3/objects/{}/{}", object_type, urlencoding::encode(object_id));
        let params = (!params.is_empty()).then_some(params.as_slice());

        self.client.get(&endpoint, params).await
    }

    /// Create an object; returns the record with its new id
    pub async fn create(&self, object_type: ObjectType, properties: &Map<String, Value>) -> Result<Value> {
        if properties.is_empty() {
            return Ok(json!({ "error": "properties cannot be empty" }));
        }

        self.client
            .post(
                &format!("/crm/v3/objects/{}", object_type),
                &json!({ "properties": properties }),
            )
            .await
    }

    /// Partially update an object
    pub async fn update(
        &self,
        object_type: ObjectType,
        object_id: &str,
        properties: &Map<String, Value>,
    ) -> Result<Value> {
        if properties.is_empty() {
            return Ok(json!({ "error": "properties cannot be empty" }));
        }

        self.client
            .patch(
                &format!("/crm/v3/objects/{}/{}", object_type, urlencoding::encode(object_id)),
                &json!({ "properties": properties }),
            )
            .await
    }

    /// Objects of `to_object_type` associated with the given object
    pub async fn get_associations(
        &self,
        from_object_type: ObjectType,
        from_object_id: &str,
        to_object_type: ObjectType,
    ) -> Result<Value> {
        let endpoint = format!(
            "/crm/v3/objects/{}/{}/associations/{}",
            from_object_type,
            urlencoding::encode(from_object_id),
            to_object_type
        );
        self.client.get(&endpoint, None).await
    }

    /// Run a tool by name with JSON arguments
    pub async fn call(&self, name: &str, args: Value) -> Result<Value> {
        tracing::debug!("Dispatching tool {}", name);

        match name {
            "hubspot_search" => {
                let args: SearchArgs = parse_args(name, args)?;
                self.search(args.object_type, &args.query, args.properties.as_deref(), args.limit)
                    .await
            }
            "hubspot_get" => {
                let args: GetArgs = parse_args(name, args)?;
                self.get(args.object_type, &args.object_id, args.properties.as_deref())
                    .await
            }
            "hubspot_create" => {
                let args: CreateArgs = parse_args(name, args)?;
                self.create(args.object_type, &args.properties).await
            }
            "hubspot_update" => {
                let args: UpdateArgs = parse_args(name, args)?;
                self.update(args.object_type, &args.object_id, &args.properties)
                    .await
            }
            "hubspot_get_associations" => {
                let args: AssociationArgs = parse_args(name, args)?;
                self.get_associations(args.from_object_type, &args.from_object_id, args.to_object_type)
                    .await
            }
            other => Err(HubSpotError::UnknownTool(other.to_string())),
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| HubSpotError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}
