use log::debug;
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    error::ProcessError,
    protocol::jsonrpc::{DECODE_ERROR, INVALID_PARAMS, IO_ERROR, METHOD_NOT_FOUND},
    standalone::standalone_function,
};

use super::stdio::ProcessorServer;

#[derive(Debug, Error)]
pub(super) enum MethodError {
    #[error("Unknown method: {0}")]
    NotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl MethodError {
    pub(super) fn code(&self) -> i32 {
        match self {
            Self::NotFound(_) => METHOD_NOT_FOUND,
            Self::InvalidParams(_) => INVALID_PARAMS,
            Self::Process(ProcessError::Decode(_)) => DECODE_ERROR,
            Self::Process(_) => IO_ERROR,
        }
    }
}

/// Helper struct for extracting method parameters.
struct Params;

impl Params {
    /// Input bytes, given either as a `data` byte array or as `text`.
    fn extract_data(params: &Value) -> Result<Vec<u8>, MethodError> {
        if let Some(text) = params["text"].as_str() {
            return Ok(text.as_bytes().to_vec());
        }

        let data = params
            .get("data")
            .ok_or_else(|| MethodError::InvalidParams("Missing data".to_string()))?;
        serde_json::from_value(data.clone())
            .map_err(|e| MethodError::InvalidParams(format!("data must be a byte array: {}", e)))
    }

    fn extract_i64(params: &Value, name: &str) -> Result<i64, MethodError> {
        let Some(value) = params[name].as_i64() else {
            return Err(MethodError::InvalidParams(format!("Missing {}", name)));
        };
        Ok(value)
    }
}

pub(super) async fn handle_method(
    server: &mut ProcessorServer,
    method: &str,
    params: Value,
) -> Result<Value, MethodError> {
    match method {
        "process" => handle_process(server, params),
        "add" => handle_add(params),
        "results" => Ok(json!({ "results": server.processor.results() })),
        "process_file" => handle_process_file(server).await,
        _ => Err(MethodError::NotFound(method.to_string())),
    }
}

fn handle_process(server: &mut ProcessorServer, params: Value) -> Result<Value, MethodError> {
    let data = Params::extract_data(&params)?;
    let result = server.processor.process(&data)?;
    Ok(json!({ "result": result }))
}

fn handle_add(params: Value) -> Result<Value, MethodError> {
    let a = Params::extract_i64(&params, "a")?;
    let b = Params::extract_i64(&params, "b")?;
    let sum = standalone_function(a, b);

    // JSON numbers are limited to 64 bits here, so wider sums go out as strings.
    let sum = match i64::try_from(sum) {
        Ok(sum) => json!(sum),
        Err(_) => {
            debug!("Sum {} exceeds i64, encoding as string", sum);
            json!(sum.to_string())
        }
    };
    Ok(json!({ "sum": sum }))
}

async fn handle_process_file(server: &mut ProcessorServer) -> Result<Value, MethodError> {
    let result = server.processor.process_file().await?;
    Ok(json!({ "result": result }))
}
