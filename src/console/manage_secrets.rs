//! Secrets screen of the interactive console.

use anyhow::Result;

use crate::model::{SecretProperties, VaultSecret};
use crate::response::{SecretPayload, SecretsResponse};
use crate::secrets::SecretsManagement;

use super::{read_continue, read_input_field, write_error_message};

#[derive(Debug)]
pub struct ManageSecrets {
    service: SecretsManagement,
}

impl ManageSecrets {
    pub fn new(service: SecretsManagement) -> Self {
        ManageSecrets { service }
    }

    pub async fn list(&self) -> Result<()> {
        let response = self.service.list().await;
        render(&response);
        read_continue()?;
        Ok(())
    }

    pub async fn create(&self) -> Result<()> {
        let secret_name = read_input_field("secret name")?;
        let secret_value = read_input_field("secret value")?;

        let response = self.service.create(&secret_name, &secret_value).await;
        render(&response);
        read_continue()?;
        Ok(())
    }

    pub async fn retrieval(&self) -> Result<()> {
        let secret_name = read_input_field("secret name")?;

        let response = self.service.retrieve(&secret_name).await;
        render(&response);
        read_continue()?;
        Ok(())
    }

    pub async fn update(&self) -> Result<()> {
        let secret_name = read_input_field("secret name")?;
        let tag_name = read_input_field("tag name")?;
        let tag_value = read_input_field("tag value")?;

        let response = self
            .service
            .update(&secret_name, &tag_name, &tag_value)
            .await;
        if let Ok(SecretPayload::Secret(secret)) = &response {
            write_updated_secret(secret);
        } else {
            render(&response);
        }
        read_continue()?;
        Ok(())
    }

    /// Menu delete reports acceptance only; completion is not awaited here.
    pub async fn delete(&self) -> Result<()> {
        let secret_name = read_input_field("secret name")?;

        let response = self.service.delete_accepted(&secret_name).await;
        render(&response);
        read_continue()?;
        Ok(())
    }
}

fn render(response: &SecretsResponse) {
    match response {
        Ok(SecretPayload::Secret(secret)) => write_secret(secret),
        Ok(SecretPayload::List(entries)) => write_secret_list(entries),
        Ok(SecretPayload::Purged(name)) => println!("- purged secret        = {name}"),
        Err(e) => write_error_message(&e.to_string()),
    }
}

fn write_secret_list(entries: &[SecretProperties]) {
    println!("- available secrets    =");
    for properties in entries {
        println!("- secret name          = {}", properties.name);
    }
}

fn write_secret(secret: &VaultSecret) {
    println!("- secret name          = {}", secret.name());
    println!("- secret value         = {}", secret.value);
    println!("- secret ID            = {}", secret.id);
}

fn write_updated_secret(secret: &VaultSecret) {
    write_secret(secret);
    println!("- secret version       = {}", secret.properties.version);
    if let Some(updated_on) = secret.properties.updated_on {
        println!("- secret updated on    = {updated_on}");
    }
    if !secret.properties.tags.is_empty() {
        println!("- tags                 =");
        for (name, value) in &secret.properties.tags {
            println!("- tag name             > {name}");
            println!("- tag value            > {value}");
        }
    }
}
