#![allow(dead_code)]

pub mod fake_transport;

use log::LevelFilter;

/// Logs will appear only when you run with `-- --nocapture`
/// or when the test fails.
pub fn init_test_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

use credsync_core::api::transport::Method;
use fake_transport::FakeTransport;
use serde_json::json;

/// Three sites:
/// * default site `s0`: data source `d0` with connections `c0a`, `c0b`
/// * `finance` (`s1`): `d1` with `c1`, and `d2` without any connection
/// * `marketing` (`s2`): no data sources at all
pub fn script_directory(fake: &FakeTransport) {
    fake.respond(
        Method::Get,
        "/sites",
        200,
        json!({"sites": {"site": [
            {"id": "s0", "name": "Default", "contentUrl": ""},
            {"id": "s1", "name": "Finance", "contentUrl": "finance"},
            {"id": "s2", "name": "Marketing", "contentUrl": "marketing"}
        ]}}),
    )
    .respond(
        Method::Get,
        "/sites/s0/datasources",
        200,
        json!({"datasources": {"datasource": [
            {"id": "d0", "name": "Sales DB", "contentUrl": "salesdb"}
        ]}}),
    )
    .respond(
        Method::Get,
        "/sites/s0/datasources/d0/connections",
        200,
        json!({"connections": {"connection": [
            {"id": "c0a", "type": "postgres", "serverAddress": "pg.internal", "serverPort": "5432", "userName": "etl"},
            {"id": "c0b", "type": "sqlserver", "serverAddress": "mssql.internal", "serverPort": 1433, "userName": "report"}
        ]}}),
    )
    .respond(
        Method::Get,
        "/sites/s1/datasources",
        200,
        json!({"datasources": {"datasource": [
            {"id": "d1", "name": "Ledger", "contentUrl": "ledger"},
            {"id": "d2", "name": "Extract Only", "contentUrl": "extract"}
        ]}}),
    )
    .respond(
        Method::Get,
        "/sites/s1/datasources/d1/connections",
        200,
        json!({"connections": {"connection": [
            {"id": "c1", "type": "oracle", "serverAddress": "ora.internal", "serverPort": "1521", "userName": "gl"}
        ]}}),
    )
    .respond(
        Method::Get,
        "/sites/s1/datasources/d2/connections",
        200,
        json!({"connections": {}}),
    )
    .respond(Method::Get, "/sites/s2/datasources", 200, json!({"datasources": {}}));
}
