//! CLI utility functions.

use anyhow::Result;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

use crate::config::ServerSettings;
use crate::jsonrpc::STAFF_METHODS;

/// Load request parameters from file or inline JSON; none means `{}`
pub fn load_request_params(
    params_file: Option<PathBuf>,
    params_json: Option<String>,
) -> Result<Value> {
    match (params_file, params_json) {
        (Some(path), None) => {
            if !path.exists() {
                anyhow::bail!("Parameters file not found: {}", path.display());
            }
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                anyhow::anyhow!("Failed to parse JSON from {}: {}", path.display(), e)
            })
        }
        (None, Some(json_str)) => serde_json::from_str(&json_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse inline JSON: {}", e)),
        (None, None) => Ok(Value::Object(Default::default())),
        (Some(_), Some(_)) => {
            anyhow::bail!("Cannot use both --params-file and --params-json");
        }
    }
}

/// Put a staff token into the params of a staff method unless one is present
pub fn attach_token(method: &str, mut params: Value, token: Option<String>) -> Result<Value> {
    if !STAFF_METHODS.contains(&method) {
        return Ok(params);
    }

    let object = params
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("Params for {} must be a JSON object", method))?;

    if !object.contains_key("token") {
        match token {
            Some(token) => {
                object.insert("token".to_string(), Value::String(token));
            }
            None => anyhow::bail!(
                "{} requires a staff token. Run 'civicalert login' or pass --token.",
                method
            ),
        }
    }

    Ok(params)
}

/// Load server settings with hierarchy (inline JSON > file > user file > defaults)
/// and log where they came from
pub fn load_server_settings(
    config_path: Option<PathBuf>,
    config_json: Option<String>,
) -> Result<ServerSettings> {
    let resolved =
        ServerSettings::load_with_precedence(config_json.as_deref(), config_path.as_deref())?;

    for source in &resolved.sources {
        info!("Config source [priority {}]: {}", source.priority, source.name);
    }

    resolved.settings.validate()?;
    Ok(resolved.settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_load_params_variants() {
        assert_eq!(load_request_params(None, None).unwrap(), json!({}));
        assert_eq!(
            load_request_params(None, Some(r#"{"id":"INC-000001"}"#.to_string())).unwrap(),
            json!({"id": "INC-000001"})
        );
        assert!(load_request_params(None, Some("{oops".to_string())).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"search": "fire"}}"#).unwrap();
        assert_eq!(
            load_request_params(Some(file.path().to_path_buf()), None).unwrap(),
            json!({"search": "fire"})
        );
    }

    #[test]
    fn test_attach_token() {
        let public = attach_token("civicalert/incident/list", json!({}), None).unwrap();
        assert_eq!(public, json!({}));

        let staff = attach_token(
            "civicalert/stats",
            json!({}),
            Some("tok".to_string()),
        )
        .unwrap();
        assert_eq!(staff["token"], "tok");

        let explicit = attach_token(
            "civicalert/stats",
            json!({"token": "mine"}),
            Some("saved".to_string()),
        )
        .unwrap();
        assert_eq!(explicit["token"], "mine");

        assert!(attach_token("civicalert/stats", json!({}), None).is_err());
        assert!(attach_token("civicalert/stats", json!([1]), Some("t".into())).is_err());
    }
}
