//! Minimal embedding example for xshield-sdk
//!
//! This example walks a segment through the steps a provider performs:
//! plan-time normalization, the metadata-only update payload, and the bulk
//! template/named-network calls that manage the segment's relations.
//!
//! Without `XSHIELD_API_KEY` it stops before talking to the API.

use std::time::Duration;
use xshield_core::models::{SegmentResourceModel, StringValue};
use xshield_core::traits::{StringRequest, apply_string_modifiers};
use xshield_core::{
    AppendManagedByModifier, ClientConfig, Context, Credentials, Error, NormalizeDeploymentModeModifier, Result,
    Security, StringPlanModifier,
};
use xshield_sdk::models::{NamedNetworkBulkRequest, NamedNetworkReference, TemplateBulkRequest, TemplateReference};
use xshield_sdk::{Options, SdkConfiguration, XshieldSdk};

fn plan(modifier: &dyn StringPlanModifier, attribute: &str, value: &str) -> StringValue {
    let req = StringRequest::new(attribute, StringValue::string(value));
    let resp = apply_string_modifiers(&[modifier], &req);
    println!("   {}: {:?} -> {:?}", attribute, value, resp.plan_value.value_string());
    resp.plan_value
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    println!("=== Embedded xshield-sdk Example ===\n");

    println!("1. Planning segment attributes...");
    let criteria = plan(&AppendManagedByModifier, "criteria", "'role' in ('web')");
    plan(&NormalizeDeploymentModeModifier, "deployment_mode", "enforce");

    let segment = SegmentResourceModel {
        id: StringValue::string("segment-1"),
        tag_based_policy_name: StringValue::string("web tier"),
        criteria,
        templates: vec!["template-1".to_string()],
        named_networks: vec!["named-network-1".to_string()],
        ..Default::default()
    };

    println!("\n2. Metadata-only update payload:");
    let payload = serde_json::to_string_pretty(&segment.to_shared_tag_based_policy_metadata())?;
    println!("{}", payload);

    if std::env::var("XSHIELD_API_KEY").is_err() {
        println!("\nXSHIELD_API_KEY is not set, skipping API calls.");
        return Ok(());
    }

    // Credentials are read on every call, so a rotated key is picked up
    // without rebuilding the SDK.
    let source = |_ctx: Context| async {
        let api_key = std::env::var("XSHIELD_API_KEY").map_err(|e| Error::security(e.to_string()))?;
        Ok::<_, Error>(Security::ConfigProvider(Credentials::new(api_key)))
    };

    let mut config = ClientConfig::new();
    if let Ok(url) = std::env::var("XSHIELD_SERVER_URL") {
        config = config.with_server_url(url);
    }
    let sdk = XshieldSdk::new(SdkConfiguration::new(config)?.with_security(source));
    let policies = sdk.tag_based_policies();
    let ctx = Context::background().with_timeout(Duration::from_secs(60));
    let policy_id = segment.id.value_string().to_string();

    println!("\n3. Applying templates...");
    let templates = segment.templates.iter().map(TemplateReference::new).collect();
    let res = policies
        .tag_based_policy_bulk_template_apply(
            &ctx,
            TemplateBulkRequest::new(policy_id.clone(), templates),
            Options::new(),
        )
        .await?;
    println!("   status {}", res.status_code);

    println!("\n4. Applying named networks...");
    let named_networks = segment.named_networks.iter().map(NamedNetworkReference::new).collect();
    let res = policies
        .tag_based_policy_bulk_named_network_apply(
            &ctx,
            NamedNetworkBulkRequest::new(policy_id, named_networks),
            Options::new(),
        )
        .await?;
    println!("   status {}", res.status_code);

    println!("\n=== Embedding Successful ===");
    Ok(())
}
