//! High-level convenience wrappers over [`Session`] and [`DiscoveryClient`].
//!
//! Pure compositions: none of these carry any state of their own (spec.md
//! section 4.H).

use serde_json::Value;

use crate::discovery::{DiscoveryClient, DiscoveryOptions};
use crate::error::CdpError;
use crate::protocol::runtime::{
    CallArgument, CallFunctionOnParams, CallFunctionOnResult, EvaluateParams, EvaluateResult,
};
use crate::session::Session;

/// Evaluate a JavaScript expression, returning the full evaluation result
/// (the remote object plus any exception details).
///
/// Sends `Runtime.evaluate` with `returnByValue: true` unless overridden via
/// `params`.
///
/// # Errors
///
/// See [`Session::send_request`].
pub async fn evaluate(session: &Session, expression: impl Into<String>) -> Result<EvaluateResult, CdpError> {
    let params = EvaluateParams {
        expression: expression.into(),
        return_by_value: Some(true),
        ..Default::default()
    };
    session.send_request("Runtime.evaluate", Some(params)).await
}

/// Evaluate a JavaScript expression and project `result.result.value`.
///
/// # Errors
///
/// See [`evaluate`]. Additionally returns the underlying
/// [`CdpError::Protocol`] translated from `exceptionDetails` when the
/// expression throws.
pub async fn eval(session: &Session, expression: impl Into<String>) -> Result<Value, CdpError> {
    let result = evaluate(session, expression).await?;
    if let Some(exception) = result.exception_details {
        return Err(CdpError::Protocol {
            code: exception.exception_id,
            message: exception.text,
            data: None,
        });
    }
    Ok(result.result.value.unwrap_or(Value::Null))
}

/// Call a function declaration on a remote object, with `returnByValue:
/// true` unless overridden.
///
/// # Errors
///
/// See [`Session::send_request`].
pub async fn call_function_on(
    session: &Session,
    function_declaration: impl Into<String>,
    object_id: Option<String>,
    arguments: Vec<CallArgument>,
) -> Result<CallFunctionOnResult, CdpError> {
    let params = CallFunctionOnParams {
        function_declaration: function_declaration.into(),
        object_id,
        arguments: if arguments.is_empty() { None } else { Some(arguments) },
        return_by_value: Some(true),
        ..Default::default()
    };
    session.send_request("Runtime.callFunctionOn", Some(params)).await
}

/// Fetch `Protocol-Version` from `versionInfo()`.
///
/// # Errors
///
/// See [`DiscoveryClient::version_info`].
pub async fn protocol_version(endpoint_url: &str) -> Result<Option<String>, CdpError> {
    let client = DiscoveryClient::new(endpoint_url, &DiscoveryOptions::default())?;
    let version = client.version_info().await?;
    Ok(version.protocol_version)
}

/// Send `Schema.getDomains`.
///
/// # Errors
///
/// See [`Session::send_request`].
pub async fn get_domains(session: &Session) -> Result<Value, CdpError> {
    session.send_request("Schema.getDomains", None::<Value>).await
}
