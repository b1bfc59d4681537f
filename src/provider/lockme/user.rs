// self
use crate::{_prelude::*, provider::ResourceOwner};

/// Lockme account returned by the `/me` endpoint.
///
/// Fields are kept verbatim; no validation happens beyond JSON decoding.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockmeUser(Map<String, Value>);
impl LockmeUser {
	/// Wraps the decoded fields.
	pub fn new(fields: Map<String, Value>) -> Self {
		Self(fields)
	}

	/// Returns the value of `field`, if present.
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.0.get(field)
	}

	/// Consumes the user and returns the underlying fields.
	pub fn into_inner(self) -> Map<String, Value> {
		self.0
	}
}
impl ResourceOwner for LockmeUser {
	fn id(&self) -> Option<&Value> {
		self.0.get("id")
	}

	fn to_map(&self) -> &Map<String, Value> {
		&self.0
	}
}
impl TryFrom<Value> for LockmeUser {
	type Error = Error;

	fn try_from(value: Value) -> Result<Self> {
		match value {
			Value::Object(fields) => Ok(Self(fields)),
			other => Err(Error::UnexpectedResponse {
				message: format!("resource owner body must be a JSON object, got `{other}`"),
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn wraps_object_fields_verbatim() {
		let user = LockmeUser::try_from(json!({ "id": 1, "name": "Acme", "roles": ["owner"] }))
			.expect("Object bodies should convert into a user.");

		assert_eq!(user.id(), Some(&json!(1)));
		assert_eq!(user.get("name"), Some(&json!("Acme")));
		assert_eq!(user.to_map().len(), 3);
	}

	#[test]
	fn rejects_non_object_bodies() {
		let err = LockmeUser::try_from(json!([1, 2])).expect_err("Arrays are not users.");

		assert!(matches!(err, Error::UnexpectedResponse { .. }));
	}

	#[test]
	fn new_and_into_inner_keep_fields() {
		let mut fields = Map::new();

		fields.insert("id".into(), json!("u-9"));
		fields.insert("locale".into(), json!("pl"));

		let user = LockmeUser::new(fields.clone());

		assert_eq!(user.id(), Some(&json!("u-9")));
		assert_eq!(user.clone().into_inner(), fields);
		assert_eq!(
			serde_json::to_value(&user).expect("Users should serialize."),
			Value::Object(fields)
		);
	}
}
