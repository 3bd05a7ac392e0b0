use std::collections::HashMap;

use crate::config::{SecretSource, StoreSecrets};
use crate::error::ConfigError;

pub(crate) const SERVICE_NAME: &str = "linkboard";
const ITEM_KIND: &str = "store";

fn attributes() -> HashMap<&'static str, &'static str> {
    let mut attrs = HashMap::new();
    attrs.insert("service", SERVICE_NAME);
    attrs.insert("kind", ITEM_KIND);
    attrs
}

fn keyring_err(context: &str, e: impl std::fmt::Display) -> ConfigError {
    ConfigError::Keyring(format!("{}: {}", context, e))
}

/// Secret is `endpoint\nkey`; endpoints contain ':' so that can't be the separator.
fn encode_secret(secrets: &StoreSecrets) -> String {
    format!("{}\n{}", secrets.endpoint, secrets.api_key)
}

fn decode_secret(secret: &str) -> Option<StoreSecrets> {
    let (endpoint, api_key) = secret.split_once('\n')?;
    if endpoint.is_empty() || api_key.is_empty() {
        return None;
    }
    Some(StoreSecrets {
        endpoint: endpoint.to_string(),
        api_key: api_key.to_string(),
    })
}

/// Store the link store endpoint and key in the system keyring via Secret Service.
pub async fn store_credentials(secrets: &StoreSecrets) -> Result<(), ConfigError> {
    let keyring = oo7::Keyring::new()
        .await
        .map_err(|e| keyring_err("Failed to connect to keyring", e))?;

    keyring
        .create_item(
            "Linkboard store",
            &attributes(),
            encode_secret(secrets).as_bytes(),
            true, // replace existing
        )
        .await
        .map_err(|e| keyring_err("Failed to store credentials", e))?;

    Ok(())
}

/// Load the link store endpoint and key from the system keyring.
pub async fn load_credentials() -> Result<Option<StoreSecrets>, ConfigError> {
    let keyring = oo7::Keyring::new()
        .await
        .map_err(|e| keyring_err("Failed to connect to keyring", e))?;

    let items = keyring
        .search_items(&attributes())
        .await
        .map_err(|e| keyring_err("Failed to search keyring", e))?;

    if let Some(item) = items.first() {
        let secret_bytes = item
            .secret()
            .await
            .map_err(|e| keyring_err("Failed to read secret", e))?;
        let secret = String::from_utf8(secret_bytes.to_vec())
            .map_err(|e| keyring_err("Invalid UTF-8 in secret", e))?;
        return Ok(decode_secret(&secret));
    }

    Ok(None)
}

/// Delete the stored link store credentials.
pub async fn delete_credentials() -> Result<(), ConfigError> {
    let keyring = oo7::Keyring::new()
        .await
        .map_err(|e| keyring_err("Failed to connect to keyring", e))?;

    let items = keyring
        .search_items(&attributes())
        .await
        .map_err(|e| keyring_err("Failed to search keyring", e))?;

    for item in items {
        item.delete()
            .await
            .map_err(|e| keyring_err("Failed to delete credential", e))?;
    }

    Ok(())
}

/// [`SecretSource`] backed by the system keyring.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringSecrets;

impl SecretSource for KeyringSecrets {
    async fn load(&self) -> Result<Option<StoreSecrets>, ConfigError> {
        load_credentials().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_encoding_survives_urls_with_colons() {
        let secrets = StoreSecrets {
            endpoint: "https://abc.supabase.co:443".into(),
            api_key: "eyJhbGciOi:xyz".into(),
        };
        assert_eq!(decode_secret(&encode_secret(&secrets)), Some(secrets));
    }

    #[test]
    fn malformed_secret_is_ignored() {
        assert_eq!(decode_secret("user:password"), None);
        assert_eq!(decode_secret("\nkey"), None);
    }
}
