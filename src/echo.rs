use crate::dispatcher::Context;
use crate::router::ParamVec;
use serde_json::{json, Map, Value};

fn params_object(params: &ParamVec) -> Map<String, Value> {
    params
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
        .collect()
}

/// Diagnostic handler: answers with what the router and transport saw.
///
/// `globrouter serve` registers it under every handler name in the
/// application file.
pub fn echo_handler(ctx: &mut Context<'_>) -> anyhow::Result<()> {
    let body = json!({
        "handler": ctx.matched.handler_name(),
        "route": ctx.matched.route.name,
        "pattern": ctx.matched.pattern.as_str(),
        "method": ctx.request.method,
        "path": ctx.request.path,
        "params": params_object(&ctx.matched.path_params),
        "query": params_object(&ctx.request.query_params),
        "request_id": ctx.request.request_id.to_string(),
    });
    ctx.response.json(200, body);
    Ok(())
}
