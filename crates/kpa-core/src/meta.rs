//! Object metadata shared by PodAutoscalers, Metrics and Deciders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identity and bookkeeping for a namespaced resource.
///
/// Every nested collection is owned, so `clone()` yields a fully
/// independent copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,
    /// Opaque version assigned by the store on every write.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
    #[serde(default)]
    pub generation: i64,
}

/// Points at the object that owns this one (e.g. the Revision owning a PA).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// The `{namespace}/{name}` key used by registries and watchers.
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    pub fn with_owner(mut self, owner: OwnerReference) -> Self {
        self.owner_references.push(owner);
        self
    }
}

/// Split a `{namespace}/{name}` key. Returns `None` unless both halves are non-empty.
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    let (namespace, name) = key.split_once('/')?;
    if namespace.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((namespace, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_through_split() {
        let meta = ObjectMeta::new("serving", "hello-00001");
        assert_eq!(meta.key(), "serving/hello-00001");
        assert_eq!(split_key(&meta.key()), Some(("serving", "hello-00001")));
    }

    #[test]
    fn split_key_rejects_malformed() {
        assert_eq!(split_key("no-slash"), None);
        assert_eq!(split_key("/name"), None);
        assert_eq!(split_key("ns/"), None);
        assert_eq!(split_key("a/b/c"), None);
    }

    #[test]
    fn clone_is_independent() {
        let original = ObjectMeta::new("ns", "pa")
            .with_label("app", "hello")
            .with_annotation("note", "x")
            .with_owner(OwnerReference {
                api_version: "serving.knative.dev/v1alpha1".to_string(),
                kind: "Revision".to_string(),
                name: "hello-00001".to_string(),
                uid: "1234".to_string(),
                controller: Some(true),
            });
        let mut copy = original.clone();
        copy.labels.insert("app".to_string(), "changed".to_string());
        copy.owner_references[0].name = "other".to_string();

        assert_eq!(original.labels["app"], "hello");
        assert_eq!(original.owner_references[0].name, "hello-00001");
    }

    #[test]
    fn serializes_camel_case_and_skips_empty() {
        let meta = ObjectMeta::new("ns", "pa").with_label("app", "hello");
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["namespace"], "ns");
        assert_eq!(json["labels"]["app"], "hello");
        assert!(json.get("annotations").is_none());
        assert!(json.get("ownerReferences").is_none());
    }
}
