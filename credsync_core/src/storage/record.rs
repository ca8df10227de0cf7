use serde::{Deserialize, Deserializer, Serialize};

/// A site as listed by `GET /sites`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    /// `""` for the default site.
    #[serde(default)]
    pub content_url: String,
}

/// A published data source, always listed under one site.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content_url: String,
}

/// One embedded connection of a data source.
///
/// File-based connections come back without address, port or user; those
/// fields default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    #[serde(rename = "type", default)]
    pub connection_type: String,
    #[serde(default)]
    pub server_address: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub server_port: String,
    #[serde(rename = "userName", default)]
    pub username: String,
}

/// The flat export row: site × data source × connection, plus the two
/// columns the operator fills in before importing.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub site_id: String,
    pub site_name: String,
    pub site_content_url: String,
    pub datasource_id: String,
    pub datasource_name: String,
    pub datasource_content_url: String,
    pub connection_id: String,
    pub connection_type: String,
    pub connection_server_address: String,
    pub connection_server_port: String,
    pub connection_username: String,
    pub updated_username: String,
    pub updated_password: String,
}

impl ConnectionRecord {
    pub fn new(site: &Site, datasource: &DataSource, connection: &Connection) -> Self {
        Self {
            site_id: site.id.clone(),
            site_name: site.name.clone(),
            site_content_url: site.content_url.clone(),
            datasource_id: datasource.id.clone(),
            datasource_name: datasource.name.clone(),
            datasource_content_url: datasource.content_url.clone(),
            connection_id: connection.id.clone(),
            connection_type: connection.connection_type.clone(),
            connection_server_address: connection.server_address.clone(),
            connection_server_port: connection.server_port.clone(),
            connection_username: connection.username.clone(),
            updated_username: String::new(),
            updated_password: String::new(),
        }
    }
}

/// The server sends ports as strings, but accept plain numbers too.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Text(String),
        Number(u64),
        Missing(()),
    }

    Ok(match Port::deserialize(deserializer)? {
        Port::Text(s) => s,
        Port::Number(n) => n.to_string(),
        Port::Missing(()) => String::new(),
    })
}
