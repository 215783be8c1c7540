#![allow(dead_code)]
// Not every test binary uses every payload

pub const READING: &str = r#"
{
    "id": "7a1707f0-166f-4c4b-bc9d-1d54c74e0137",
    "origin": 1602168089665565200,
    "deviceName": "meter-01",
    "resourceName": "ActivePower",
    "profileName": "Power-Meter",
    "valueType": "Float32",
    "value": "12.5"
}
"#;

pub const BAD_READING: &str = r#"
{
    "origin": 0,
    "deviceName": "meter 01",
    "resourceName": "ActivePower",
    "profileName": "Power-Meter",
    "valueType": "Float32",
    "value": "12.5"
}
"#;

pub const SUBSCRIPTION: &str = r#"
{
    "name": "ops-alerts",
    "channels": [
        {"type": "EMAIL", "recipients": ["ops@example.com"]},
        {"type": "REST", "host": "notify.local", "port": 443, "httpMethod": "POST"}
    ],
    "receiver": "ops",
    "categories": ["health-check"],
    "resendInterval": "5m",
    "adminState": "UNLOCKED"
}
"#;

pub const INTERVAL: &str = r#"
{
    "name": "hourly",
    "start": "20240101T000000",
    "interval": "1h"
}
"#;

pub const PROFILE_YAML: &str = r#"
name: "Power-Meter"
manufacturer: "Acme"
model: "PM-100"
labels: [power, meter]
deviceResources:
  - name: "ActivePower"
    properties:
      valueType: "float32"
      readWrite: "R"
      units: "kW"
  - name: "Relay"
    properties:
      valueType: "Bool"
      readWrite: "RW"
deviceCommands:
  - name: "Switch"
    readWrite: "W"
    resourceOperations:
      - deviceResource: "Relay"
"#;

pub const WRITABLE_BINARY_PROFILE_YAML: &str = r#"
name: "Camera"
deviceResources:
  - name: "Snapshot"
    properties:
      valueType: "Binary"
      readWrite: "RW"
      mediaType: "image/jpeg"
"#;
