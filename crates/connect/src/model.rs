//! Connect API records

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A vault as returned by `GET /v1/vaults`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    /// Vault UUID
    pub id: String,
    /// Vault title
    pub name: String,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reference from an item back to its vault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRef {
    /// Vault UUID
    pub id: String,
}

/// Section a field belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSection {
    /// Section id
    pub id: String,
    /// Section label, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A single field on an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field id
    #[serde(default)]
    pub id: String,
    /// Field label; this is the key [`Item::get_value`] matches on
    #[serde(default)]
    pub label: String,
    /// Field value
    #[serde(default)]
    pub value: String,
    /// Field type (`STRING`, `CONCEALED`, ...)
    #[serde(default, rename = "type")]
    pub field_type: String,
    /// Built-in purpose (`USERNAME`, `PASSWORD`, `NOTES`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Owning section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<FieldSection>,
}

/// An item with its field values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item UUID
    pub id: String,
    /// Item title
    pub title: String,
    /// Vault holding the item
    #[serde(default)]
    pub vault: VaultRef,
    /// Item category (`LOGIN`, `DATABASE`, ...)
    #[serde(default)]
    pub category: String,
    /// Field list in server order
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Item {
    /// Value of the first field labelled `label`, or an empty string.
    ///
    /// A missing field and an empty field are indistinguishable here.
    #[must_use]
    pub fn get_value(&self, label: &str) -> String {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    /// Labels of all fields, in server order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.label.as_str()).collect()
    }
}

/// Anything that can answer "what is the value for this key".
///
/// Population only needs this one lookup, so it works against an [`Item`]
/// fetched from Connect as well as plain maps.
pub trait ItemValues {
    /// Value for `key`, or an empty string if there is none.
    fn get_value(&self, key: &str) -> String;
}

impl ItemValues for Item {
    fn get_value(&self, key: &str) -> String {
        Self::get_value(self, key)
    }
}

impl<S: std::hash::BuildHasher> ItemValues for HashMap<String, String, S> {
    fn get_value(&self, key: &str) -> String {
        self.get(key).cloned().unwrap_or_default()
    }
}

impl ItemValues for BTreeMap<String, String> {
    fn get_value(&self, key: &str) -> String {
        self.get(key).cloned().unwrap_or_default()
    }
}
