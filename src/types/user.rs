use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user record as served by the remote user service.
///
/// Fields the dashboard does not display are kept in `extra` so a full-record
/// replace sends them back untouched.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub address: Address,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Company {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Address {
    #[serde(default)]
    pub address: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Payload for creating a user. The service assigns the id.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Fields to replace on the selected user. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self == &UserPatch::default()
    }

    /// Merge onto a copy of `user`. The id always comes from `user`.
    pub fn apply_to(&self, user: &User) -> User {
        let mut merged = user.clone();
        if let Some(first_name) = &self.first_name {
            merged.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            merged.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            merged.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            merged.phone = phone.clone();
        }
        if let Some(company) = &self.company {
            merged.company.name = company.clone();
        }
        if let Some(address) = &self.address {
            merged.address.address = address.clone();
        }
        merged
    }
}

/// One page of the user list.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct UserPage {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub total: u64,
}

/// Response to a create request. Only the assigned id is read.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CreatedUser {
    pub id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_service_record_and_keeps_unknown_fields() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "firstName": "Emily",
            "lastName": "Johnson",
            "email": "emily.johnson@x.dummyjson.com",
            "phone": "+81 965-431-3024",
            "role": "admin",
            "age": 28,
            "company": { "name": "Dooley, Kozey and Cronin", "title": "Sales Manager" },
            "address": { "address": "626 Main Street", "city": "Phoenix" }
        }))
        .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.full_name(), "Emily Johnson");
        assert_eq!(user.role.as_deref(), Some("admin"));
        assert_eq!(user.status, None);
        assert_eq!(user.extra.get("age"), Some(&json!(28)));
        assert_eq!(user.company.extra.get("title"), Some(&json!("Sales Manager")));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["age"], json!(28));
        assert_eq!(back["address"]["city"], json!("Phoenix"));
        assert_eq!(back["firstName"], json!("Emily"));
        assert!(back.get("status").is_none());
    }

    #[test]
    fn patch_keeps_id_and_untouched_fields() {
        let user = User {
            id: 7,
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "ann@example.com".to_string(),
            ..User::default()
        };
        let patch = UserPatch {
            first_name: Some("Anne".to_string()),
            company: Some("Acme".to_string()),
            ..UserPatch::default()
        };

        let merged = patch.apply_to(&user);

        assert_eq!(merged.id, 7);
        assert_eq!(merged.first_name, "Anne");
        assert_eq!(merged.last_name, "Lee");
        assert_eq!(merged.email, "ann@example.com");
        assert_eq!(merged.company.name, "Acme");
        assert_eq!(user.first_name, "Ann");
    }

    #[test]
    fn empty_patch() {
        assert!(UserPatch::default().is_empty());
        let patch = UserPatch {
            phone: Some("1234".to_string()),
            ..UserPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
