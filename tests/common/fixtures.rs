//! Universe fixtures for integration tests.
#![allow(dead_code)]

use errproxy::adapters::universe::TypeUniverse;
use errproxy::adapters::universe::model::UniverseFile;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

pub const STORE: &str = "example.com/store";
pub const MULTIPTR: &str = "example.com/errproxy/test/multiptr";
pub const MULTIPTR_JSON: &str = "tests/fixtures/multiptr.json";

pub fn universe(value: Value) -> TypeUniverse {
    let spec: UniverseFile = serde_json::from_value(value).expect("universe fixture");
    TypeUniverse::from_spec(spec).expect("valid universe fixture")
}

/// `R.Get() (T, error)` and `T.Val() (string, error)`.
pub fn store_json() -> Value {
    json!({
        "packages": [{
            "path": STORE,
            "name": "store",
            "types": [
                { "name": "R", "kind": "struct", "methods": [
                    { "name": "Get", "receiver": "pointer", "receiver_name": "r",
                      "results": ["T", "error"] } ] },
                { "name": "T", "kind": "struct", "methods": [
                    { "name": "Val", "receiver": "value", "receiver_name": "t",
                      "results": ["string", "error"] } ] }
            ]
        }]
    })
}

/// `A.Next() B`, `B.Prev() A`, and `B.Fail() error`: the error sits on one side of a cycle.
pub fn cycle_json() -> Value {
    json!({
        "packages": [{
            "path": STORE,
            "types": [
                { "name": "A", "kind": "struct", "methods": [
                    { "name": "Next", "receiver": "pointer", "receiver_name": "a", "results": ["*B"] } ] },
                { "name": "B", "kind": "struct", "methods": [
                    { "name": "Prev", "receiver": "pointer", "receiver_name": "b", "results": ["*A"] },
                    { "name": "Fail", "receiver": "pointer", "receiver_name": "b", "results": ["error"] } ] }
            ]
        }]
    })
}

/// Types spread over two packages, only one of which is in scope by default.
pub fn two_package_json() -> Value {
    json!({
        "packages": [
            { "path": STORE, "types": [
                { "name": "Client", "kind": "struct", "methods": [
                    { "name": "Audit", "receiver": "pointer", "receiver_name": "c",
                      "results": ["example.com/audit.Log"] },
                    { "name": "Ping", "receiver": "pointer", "receiver_name": "c" } ] } ] },
            { "path": "example.com/audit", "types": [
                { "name": "Log", "kind": "interface", "methods": [
                    { "name": "Flush", "results": ["error"] } ] } ] }
        ]
    })
}

/// `example.com/a/model.User` and `example.com/b/model.User`: same package name, same type name.
pub fn shadowed_model_json() -> Value {
    json!({
        "packages": [
            { "path": "example.com/a/model", "types": [
                { "name": "User", "kind": "struct", "methods": [
                    { "name": "Other", "receiver": "pointer", "receiver_name": "u",
                      "results": ["*example.com/b/model.User", "error"] } ] } ] },
            { "path": "example.com/b/model", "types": [
                { "name": "User", "kind": "struct", "methods": [
                    { "name": "Save", "receiver": "pointer", "receiver_name": "u",
                      "results": ["error"] } ] } ] }
        ]
    })
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).expect("serialize fixture"))
        .expect("write fixture");
    path
}
