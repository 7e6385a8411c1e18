//! Product module and module attribute schema models.

use serde::{Deserialize, Serialize};

/// A named grouping of test cases within a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductModule {
    pub id: String,
    pub product_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModuleRequest {
    pub product_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModuleRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Attribute schema entry declared on a module.
///
/// Test case attributes of the module are expected to use these keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAttribute {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub module_id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    pub key: String,
    /// Value type hint (text, number, select, ...)
    #[serde(default, rename = "type")]
    pub value_type: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl ModuleAttribute {
    /// Schema entry with only a key, as used when building attribute merges.
    pub fn with_key(key: impl Into<String>) -> Self {
        let key = key.into();
        ModuleAttribute {
            id: String::new(),
            module_id: String::new(),
            name: key.clone(),
            key,
            value_type: "text".to_string(),
            is_required: false,
            options: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAttributeRequest {
    pub name: String,
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub is_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}
