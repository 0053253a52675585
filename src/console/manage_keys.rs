//! Keys screen of the interactive console.

use anyhow::Result;

use crate::keys::KeysManagement;
use crate::model::{KeyKind, KeyProperties, VaultKey};
use crate::response::{KeyPayload, KeysResponse};

use super::{read_continue, read_input_field, write_error_message};

#[derive(Debug)]
pub struct ManageKeys {
    service: KeysManagement,
}

impl ManageKeys {
    pub fn new(service: KeysManagement) -> Self {
        ManageKeys { service }
    }

    pub async fn list(&self) -> Result<()> {
        let response = self.service.list().await;
        render(&response);
        read_continue()?;
        Ok(())
    }

    pub async fn create(&self) -> Result<()> {
        let key_name = read_input_field("key name")?;
        let kind = read_key_kind()?;

        let response = self.service.create(&key_name, kind).await;
        render(&response);
        read_continue()?;
        Ok(())
    }

    pub async fn retrieval(&self) -> Result<()> {
        let key_name = read_input_field("key name")?;

        let response = self.service.retrieve(&key_name).await;
        render(&response);
        read_continue()?;
        Ok(())
    }

    pub async fn update(&self) -> Result<()> {
        let key_name = read_input_field("key name")?;
        let tag_name = read_input_field("tag name")?;
        let tag_value = read_input_field("tag value")?;

        let response = self.service.update(&key_name, &tag_name, &tag_value).await;
        if let Ok(KeyPayload::Key(key)) = &response {
            write_updated_key(key);
        } else {
            render(&response);
        }
        read_continue()?;
        Ok(())
    }

    /// Menu delete reports acceptance only; completion is not awaited here.
    pub async fn delete(&self) -> Result<()> {
        let key_name = read_input_field("key name")?;

        let response = self.service.delete_accepted(&key_name).await;
        render(&response);
        read_continue()?;
        Ok(())
    }
}

fn read_key_kind() -> std::io::Result<KeyKind> {
    println!("- [ 1 ] ELLIPTIC CURVE");
    println!("- [ 2 ] RSA");

    let option = read_input_field("key type")?;
    Ok(match option.as_str() {
        "1" => KeyKind::Ec,
        _ => KeyKind::Rsa,
    })
}

fn render(response: &KeysResponse) {
    match response {
        Ok(KeyPayload::Key(key)) => write_key(key),
        Ok(KeyPayload::List(entries)) => write_key_list(entries),
        Ok(KeyPayload::Purged(name)) => println!("- purged key           = {name}"),
        Err(e) => write_error_message(&e.to_string()),
    }
}

fn write_key_list(entries: &[KeyProperties]) {
    println!("- available keys       =");
    for properties in entries {
        println!("- key name             = {}", properties.name);
    }
}

fn write_key(key: &VaultKey) {
    println!("- key name             = {}", key.name());
    println!("- key type             = {}", key.kind);
    println!("- key ID               = {}", key.id);
}

fn write_updated_key(key: &VaultKey) {
    write_key(key);
    println!("- key version          = {}", key.properties.version);
    if let Some(updated_on) = key.properties.updated_on {
        println!("- key updated on       = {updated_on}");
    }
    if !key.properties.tags.is_empty() {
        println!("- tags                 =");
        for (name, value) in &key.properties.tags {
            println!("- tag name             > {name}");
            println!("- tag value            > {value}");
        }
    }
}
