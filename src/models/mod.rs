use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mutations posted back to the page (or to a fixed endpoint), keyed by `action`.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "action")]
pub(crate) enum PageAction {
    #[serde(rename = "tageditor")]
    TagList {
        tagaction: String,
        newtags: Vec<String>,
    },
    #[serde(rename = "tageditor")]
    TagMetadata {
        tagaction: String,
        tag: String,
        value: Option<String>,
    },
    #[serde(rename = "spliteditor")]
    SplitList {
        splitaction: String,
        newsplits: Vec<String>,
    },
    #[serde(rename = "spliteditor")]
    SplitMetadata {
        splitaction: String,
        split: String,
        value: Option<String>,
    },
    #[serde(rename = "update_option")]
    UpdateOption {
        option_key: String,
        option_value: bool,
    },
    #[serde(rename = "generate_invite")]
    GenerateInvite,
    #[serde(rename = "new_api_token")]
    NewApiToken {
        api_token_generate_description: String,
    },
    #[serde(rename = "revoke_api_token")]
    RevokeApiToken { api_token_id: String },
    #[serde(rename = "field_info")]
    FieldInfo { field: String },
    #[serde(rename = "add_comment")]
    AddComment { comment: String },
    #[serde(rename = "delete_comment")]
    DeleteComment { comment_id: String },
}

/// Grant or revoke one dataset role. The server reads these as form fields, not JSON.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RoleChange {
    pub grant: bool,
    pub annouser: String,
    pub annorole: String,
}

impl RoleChange {
    pub fn form_fields(&self) -> [(&'static str, String); 3] {
        let action = if self.grant { "add_role" } else { "rem_role" };
        [
            ("action", action.to_string()),
            ("annouser", self.annouser.clone()),
            ("annorole", self.annorole.clone()),
        ]
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct BulkActionRequest {
    pub bulk_action: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct RowTagRequest {
    pub single_row: String,
    pub set_tag: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct InviteResponse {
    pub uri: String,
    pub by: String,
    pub token: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct TokenResponse {
    pub token: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) struct AclResponse {
    #[serde(default)]
    pub new_roles: Vec<String>,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) struct BulkActionResponse {
    #[serde(default)]
    pub applied: u64,
    #[serde(default)]
    pub affected: u64,
}

impl BulkActionResponse {
    pub fn summary(&self) -> String {
        if self.applied == 0 {
            return "The bulk action did not affect any entries.".to_string();
        }
        let mut msg = format!("Bulk action was applied to {} entries.", self.applied);
        let unchanged = self.affected.saturating_sub(self.applied);
        if unchanged > 0 {
            msg.push_str(&format!(
                " {unchanged} elements remained unchanged (tied votes)."
            ));
        }
        msg
    }
}

/// `{min, max}` of a dataset field; either side may be a number or a string.
#[derive(Deserialize, Clone, Debug, PartialEq, Default)]
pub(crate) struct FieldInfo {
    #[serde(default)]
    pub min: serde_json::Value,
    #[serde(default)]
    pub max: serde_json::Value,
}

impl FieldInfo {
    pub fn display(v: &serde_json::Value) -> String {
        match v {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Default)]
pub(crate) struct TagMeta {
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub(crate) struct Fleiss {
    pub kappa: f64,
    #[serde(default)]
    pub interpretation: String,
}

/// Annotation statistics for one task, as served by `overview.json`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Default)]
pub(crate) struct OverviewData {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub all_annotations: BTreeMap<String, f64>,
    /// annotator -> tag -> count
    #[serde(default)]
    pub annotations: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    pub tag_metadata: BTreeMap<String, TagMeta>,
    #[serde(default)]
    pub fleiss: Option<Fleiss>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_list_request_contract() {
        let v = serde_json::to_value(PageAction::TagList {
            tagaction: "move_tag_down".to_string(),
            newtags: vec!["b".to_string(), "a".to_string()],
        })
        .expect("should serialize");
        assert_eq!(
            v,
            serde_json::json!({"action": "tageditor", "tagaction": "move_tag_down", "newtags": ["b", "a"]})
        );
    }

    #[test]
    fn test_tag_metadata_request_keeps_null_value() {
        let v = serde_json::to_value(PageAction::TagMetadata {
            tagaction: "set_color".to_string(),
            tag: "urgent".to_string(),
            value: None,
        })
        .expect("should serialize");
        assert_eq!(v["action"], "tageditor");
        assert_eq!(v["tag"], "urgent");
        assert!(v["value"].is_null());
    }

    #[test]
    fn test_role_change_form_fields() {
        let mut change = RoleChange {
            grant: true,
            annouser: "7".to_string(),
            annorole: "curator".to_string(),
        };
        assert_eq!(
            change.form_fields(),
            [
                ("action", "add_role".to_string()),
                ("annouser", "7".to_string()),
                ("annorole", "curator".to_string()),
            ]
        );
        change.grant = false;
        assert_eq!(change.form_fields()[0], ("action", "rem_role".to_string()));
    }

    #[test]
    fn test_invite_request() {
        let v = serde_json::to_value(PageAction::GenerateInvite).expect("should serialize");
        assert_eq!(v, serde_json::json!({"action": "generate_invite"}));
    }

    #[test]
    fn test_bulk_request_has_no_action_key() {
        let v = serde_json::to_value(BulkActionRequest {
            bulk_action: "majority_vote".to_string(),
        })
        .expect("should serialize");
        assert_eq!(v, serde_json::json!({"bulk_action": "majority_vote"}));
    }

    #[test]
    fn test_bulk_summary_messages() {
        let none = BulkActionResponse { applied: 0, affected: 4 };
        assert_eq!(none.summary(), "The bulk action did not affect any entries.");

        let all = BulkActionResponse { applied: 3, affected: 3 };
        assert_eq!(all.summary(), "Bulk action was applied to 3 entries.");

        let tied = BulkActionResponse { applied: 3, affected: 5 };
        assert_eq!(
            tied.summary(),
            "Bulk action was applied to 3 entries. 2 elements remained unchanged (tied votes)."
        );
    }

    #[test]
    fn test_overview_tolerates_missing_sections() {
        let json = r#"{
            "tags": ["pos", "neg"],
            "all_annotations": {"pos": 4},
            "annotations": {"alice": {"pos": 3}, "bob": {"pos": 1, "neg": 2}}
        }"#;
        let parsed: OverviewData = serde_json::from_str(json).expect("overview should parse");
        assert_eq!(parsed.tags, vec!["pos", "neg"]);
        assert!(parsed.fleiss.is_none());
        assert!(parsed.tag_metadata.is_empty());
        assert_eq!(parsed.annotations["bob"]["neg"], 2.0);
    }

    #[test]
    fn test_acl_response_defaults_to_no_roles() {
        let parsed: AclResponse = serde_json::from_str("{}").expect("should parse");
        assert!(parsed.new_roles.is_empty());
    }

    #[test]
    fn test_field_info_display() {
        let parsed: FieldInfo =
            serde_json::from_str(r#"{"min": 0.5, "max": "zebra"}"#).expect("should parse");
        assert_eq!(FieldInfo::display(&parsed.min), "0.5");
        assert_eq!(FieldInfo::display(&parsed.max), "zebra");
        assert_eq!(FieldInfo::display(&serde_json::Value::Null), "");
    }
}
