//! Declarative value schemas and the schema validation pipe.
//!
//! A [`Schema`] describes the expected shape of a JSON value: object fields
//! with required/optional semantics, string length, UUID format and literal
//! prefix constraints, numeric ranges. Every rule carries its own message so
//! routes surface the exact wording they declare.
//!
//! [`SchemaPipe`] turns a schema into a [`Pipe`]: validation failures become
//! structured errors at a configurable status (400 by default) carrying
//! either a configured override message or the ordered list of violated
//! constraint messages.

use async_trait::async_trait;
use http::StatusCode;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use aquila_core::{HttpError, Pipe};

/// A declarative shape for a JSON value.
#[derive(Debug, Clone)]
pub enum Schema {
    /// An object with declared fields.
    Object(ObjectSchema),
    /// A string with optional constraints.
    String(StringSchema),
    /// A number with optional range constraints.
    Number(NumberSchema),
}

impl Schema {
    /// Starts an object schema.
    #[must_use]
    pub fn object() -> ObjectSchema {
        ObjectSchema::default()
    }

    /// Starts a string schema.
    #[must_use]
    pub fn string() -> StringSchema {
        StringSchema::default()
    }

    /// Starts a number schema.
    #[must_use]
    pub fn number() -> NumberSchema {
        NumberSchema::default()
    }

    /// Validates a value, returning the (possibly transformed) value or the
    /// ordered list of violated constraint messages.
    pub fn validate(&self, value: &Value) -> Result<Value, Vec<String>> {
        match self {
            Self::Object(schema) => schema.validate(value),
            Self::String(schema) => schema.validate(value),
            Self::Number(schema) => schema.validate(value),
        }
    }
}

impl From<ObjectSchema> for Schema {
    fn from(schema: ObjectSchema) -> Self {
        Self::Object(schema)
    }
}

impl From<StringSchema> for Schema {
    fn from(schema: StringSchema) -> Self {
        Self::String(schema)
    }
}

impl From<NumberSchema> for Schema {
    fn from(schema: NumberSchema) -> Self {
        Self::Number(schema)
    }
}

/// Literal-prefix constraint on a string, optionally stripping the prefix
/// from the output value.
#[derive(Debug, Clone)]
struct PrefixRule {
    prefix: String,
    message: String,
    strip: bool,
}

/// String schema: presence, type, length, UUID format and prefix rules.
///
/// # Example
///
/// ```
/// use aquila_pipes::Schema;
///
/// let schema = Schema::string()
///     .starts_with("Bearer ", "authorization must use the Bearer scheme")
///     .strip_prefix();
///
/// let value = schema.validate(&serde_json::json!("Bearer abc")).unwrap();
/// assert_eq!(value, serde_json::json!("abc"));
/// ```
#[derive(Debug, Clone)]
pub struct StringSchema {
    required_message: String,
    type_message: String,
    min: Option<(usize, String)>,
    max: Option<(usize, String)>,
    uuid_message: Option<String>,
    prefix: Option<PrefixRule>,
}

impl Default for StringSchema {
    fn default() -> Self {
        Self {
            required_message: "value is a required field".to_string(),
            type_message: "value must be a string type".to_string(),
            min: None,
            max: None,
            uuid_message: None,
            prefix: None,
        }
    }
}

impl StringSchema {
    /// Sets the message reported when the value is absent.
    #[must_use]
    pub fn required_error(mut self, message: impl Into<String>) -> Self {
        self.required_message = message.into();
        self
    }

    /// Sets the message reported when the value is not a string.
    #[must_use]
    pub fn type_error(mut self, message: impl Into<String>) -> Self {
        self.type_message = message.into();
        self
    }

    /// Requires at least `length` characters.
    #[must_use]
    pub fn min(mut self, length: usize, message: impl Into<String>) -> Self {
        self.min = Some((length, message.into()));
        self
    }

    /// Requires at most `length` characters.
    #[must_use]
    pub fn max(mut self, length: usize, message: impl Into<String>) -> Self {
        self.max = Some((length, message.into()));
        self
    }

    /// Requires the canonical UUID textual form (8-4-4-4-12, case-insensitive).
    #[must_use]
    pub fn uuid(mut self, message: impl Into<String>) -> Self {
        self.uuid_message = Some(message.into());
        self
    }

    /// Requires a literal prefix.
    #[must_use]
    pub fn starts_with(mut self, prefix: impl Into<String>, message: impl Into<String>) -> Self {
        self.prefix = Some(PrefixRule {
            prefix: prefix.into(),
            message: message.into(),
            strip: false,
        });
        self
    }

    /// Strips the declared prefix from the output value. No effect without a
    /// preceding `starts_with`.
    #[must_use]
    pub fn strip_prefix(mut self) -> Self {
        if let Some(rule) = &mut self.prefix {
            rule.strip = true;
        }
        self
    }

    /// Validates a value against the string rules.
    pub fn validate(&self, value: &Value) -> Result<Value, Vec<String>> {
        if value.is_null() {
            return Err(vec![self.required_message.clone()]);
        }

        let Some(input) = value.as_str() else {
            return Err(vec![self.type_message.clone()]);
        };

        let mut violations = Vec::new();
        let length = input.chars().count();

        if let Some((min, message)) = &self.min {
            if length < *min {
                violations.push(message.clone());
            }
        }

        if let Some((max, message)) = &self.max {
            if length > *max {
                violations.push(message.clone());
            }
        }

        if let Some(message) = &self.uuid_message {
            if !is_canonical_uuid(input) {
                violations.push(message.clone());
            }
        }

        if let Some(rule) = &self.prefix {
            if !input.starts_with(&rule.prefix) {
                violations.push(rule.message.clone());
            }
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        let output = match &self.prefix {
            Some(rule) if rule.strip => input
                .strip_prefix(&rule.prefix)
                .unwrap_or(input)
                .to_string(),
            _ => input.to_string(),
        };

        Ok(Value::String(output))
    }
}

/// The hyphenated 8-4-4-4-12 form only; `Uuid::parse_str` alone also accepts
/// the 32-character simple form.
fn is_canonical_uuid(input: &str) -> bool {
    input.len() == 36 && uuid::Uuid::parse_str(input).is_ok()
}

/// Number schema: presence, type and range rules.
#[derive(Debug, Clone)]
pub struct NumberSchema {
    required_message: String,
    type_message: String,
    min: Option<(f64, String)>,
    max: Option<(f64, String)>,
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self {
            required_message: "value is a required field".to_string(),
            type_message: "value must be a number type".to_string(),
            min: None,
            max: None,
        }
    }
}

impl NumberSchema {
    /// Sets the message reported when the value is absent.
    #[must_use]
    pub fn required_error(mut self, message: impl Into<String>) -> Self {
        self.required_message = message.into();
        self
    }

    /// Sets the message reported when the value is not a number.
    #[must_use]
    pub fn type_error(mut self, message: impl Into<String>) -> Self {
        self.type_message = message.into();
        self
    }

    /// Requires the value to be at least `bound`.
    #[must_use]
    pub fn min(mut self, bound: f64, message: impl Into<String>) -> Self {
        self.min = Some((bound, message.into()));
        self
    }

    /// Requires the value to be at most `bound`.
    #[must_use]
    pub fn max(mut self, bound: f64, message: impl Into<String>) -> Self {
        self.max = Some((bound, message.into()));
        self
    }

    /// Validates a value against the number rules.
    pub fn validate(&self, value: &Value) -> Result<Value, Vec<String>> {
        if value.is_null() {
            return Err(vec![self.required_message.clone()]);
        }

        let Some(input) = value.as_f64() else {
            return Err(vec![self.type_message.clone()]);
        };

        let mut violations = Vec::new();

        if let Some((min, message)) = &self.min {
            if input < *min {
                violations.push(message.clone());
            }
        }

        if let Some((max, message)) = &self.max {
            if input > *max {
                violations.push(message.clone());
            }
        }

        if violations.is_empty() {
            Ok(value.clone())
        } else {
            Err(violations)
        }
    }
}

/// One declared object field.
#[derive(Debug, Clone)]
struct FieldRule {
    schema: Schema,
    required: bool,
}

/// Object schema: declared fields validated in declaration order.
///
/// Undeclared members are dropped from the output; declared members are
/// replaced by their validated (possibly transformed) values.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    required_message: String,
    type_message: String,
    fields: IndexMap<String, FieldRule>,
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self {
            required_message: "value is a required field".to_string(),
            type_message: "value must be an object type".to_string(),
            fields: IndexMap::new(),
        }
    }
}

impl ObjectSchema {
    /// Sets the message reported when the value is absent.
    #[must_use]
    pub fn required_error(mut self, message: impl Into<String>) -> Self {
        self.required_message = message.into();
        self
    }

    /// Sets the message reported when the value is not an object.
    #[must_use]
    pub fn type_error(mut self, message: impl Into<String>) -> Self {
        self.type_message = message.into();
        self
    }

    /// Declares a required field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.fields.insert(
            name.into(),
            FieldRule {
                schema: schema.into(),
                required: true,
            },
        );
        self
    }

    /// Declares an optional field: absence is fine, presence is validated.
    #[must_use]
    pub fn optional_field(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.fields.insert(
            name.into(),
            FieldRule {
                schema: schema.into(),
                required: false,
            },
        );
        self
    }

    /// Validates a value against the declared fields.
    pub fn validate(&self, value: &Value) -> Result<Value, Vec<String>> {
        if value.is_null() {
            return Err(vec![self.required_message.clone()]);
        }

        let Some(members) = value.as_object() else {
            return Err(vec![self.type_message.clone()]);
        };

        let mut violations = Vec::new();
        let mut output = Map::new();

        for (name, rule) in &self.fields {
            let member = members.get(name).cloned().unwrap_or(Value::Null);

            if member.is_null() && !rule.required {
                continue;
            }

            match rule.schema.validate(&member) {
                Ok(validated) => {
                    output.insert(name.clone(), validated);
                }
                Err(messages) => violations.extend(messages),
            }
        }

        if violations.is_empty() {
            Ok(Value::Object(output))
        } else {
            Err(violations)
        }
    }
}

/// Pipe that validates its input against a declared [`Schema`].
///
/// # Example
///
/// ```
/// use aquila_pipes::{Schema, SchemaPipe};
/// use aquila_core::Pipe;
///
/// # tokio_test::block_on(async {
/// let pipe = SchemaPipe::new(
///     Schema::object().field("username", Schema::string().required_error("username is a required field")),
/// );
///
/// let err = pipe.transform(serde_json::json!({})).await.unwrap_err();
/// assert_eq!(err.body()["message"], "username is a required field");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct SchemaPipe {
    schema: Schema,
    status: StatusCode,
    message: Option<String>,
    first_only: bool,
}

impl SchemaPipe {
    /// Creates a schema pipe failing at 400 with the violated constraint
    /// messages.
    #[must_use]
    pub fn new(schema: impl Into<Schema>) -> Self {
        Self {
            schema: schema.into(),
            status: StatusCode::BAD_REQUEST,
            message: None,
            first_only: false,
        }
    }

    /// Overrides the failure status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Replaces all violation messages with one fixed message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Reports only the first violated constraint's message.
    #[must_use]
    pub fn first_violation_only(mut self) -> Self {
        self.first_only = true;
        self
    }
}

#[async_trait]
impl Pipe for SchemaPipe {
    async fn transform(&self, value: Value) -> Result<Value, HttpError> {
        match self.schema.validate(&value) {
            Ok(validated) => Ok(validated),
            Err(mut violations) => {
                if let Some(message) = &self.message {
                    return Err(HttpError::new(self.status, message.clone()));
                }
                if self.first_only {
                    let first = if violations.is_empty() {
                        String::new()
                    } else {
                        violations.remove(0)
                    };
                    return Err(HttpError::new(self.status, first));
                }
                Err(HttpError::with_messages(self.status, violations))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upsert_schema() -> ObjectSchema {
        Schema::object()
            .field(
                "rating",
                Schema::number()
                    .required_error("rating is a required field")
                    .type_error("rating must be a number type")
                    .min(1.0, "rating must be greater than or equal to 1")
                    .max(5.0, "rating must be less than or equal to 5"),
            )
            .field(
                "comment",
                Schema::string()
                    .required_error("comment is a required field")
                    .type_error("comment must be a string type")
                    .min(1, "must be at least 1 characters")
                    .max(255, "must be at most 255 characters"),
            )
    }

    #[test]
    fn string_presence_type_and_format() {
        let schema = Schema::string()
            .required_error("id is a required field")
            .type_error("id must be a string type")
            .uuid("id must be a valid UUID");

        assert_eq!(
            schema.validate(&Value::Null).unwrap_err(),
            vec!["id is a required field"]
        );
        assert_eq!(
            schema.validate(&json!(123)).unwrap_err(),
            vec!["id must be a string type"]
        );
        assert_eq!(
            schema.validate(&json!("not-a-uuid")).unwrap_err(),
            vec!["id must be a valid UUID"]
        );

        let id = "2797835f-76a4-46b6-8572-10027ab06ed8";
        assert_eq!(schema.validate(&json!(id)).unwrap(), json!(id));
    }

    #[test]
    fn uuid_rejects_the_unhyphenated_form() {
        let schema = Schema::string().uuid("id must be a valid UUID");
        let simple = "2797835f76a446b6857210027ab06ed8";
        assert!(schema.validate(&json!(simple)).is_err());
    }

    #[test]
    fn uuid_is_case_insensitive() {
        let schema = Schema::string().uuid("id must be a valid UUID");
        let upper = "2797835F-76A4-46B6-8572-10027AB06ED8";
        assert!(schema.validate(&json!(upper)).is_ok());
    }

    #[test]
    fn prefix_rule_strips_when_asked() {
        let schema = Schema::string()
            .starts_with("Bearer ", "unauthorized")
            .strip_prefix();

        assert_eq!(schema.validate(&json!("Bearer abc")).unwrap(), json!("abc"));
        assert_eq!(
            schema.validate(&json!("Basic abc")).unwrap_err(),
            vec!["unauthorized"]
        );
    }

    #[test]
    fn prefix_rule_without_strip_keeps_value() {
        let schema = Schema::string().starts_with("Bearer ", "unauthorized");
        assert_eq!(
            schema.validate(&json!("Bearer abc")).unwrap(),
            json!("Bearer abc")
        );
    }

    #[test]
    fn string_length_rules() {
        let schema = Schema::string()
            .min(1, "too short")
            .max(3, "too long");

        assert_eq!(schema.validate(&json!("")).unwrap_err(), vec!["too short"]);
        assert_eq!(schema.validate(&json!("abcd")).unwrap_err(), vec!["too long"]);
        assert!(schema.validate(&json!("ab")).is_ok());
    }

    #[test]
    fn number_range_rules() {
        let schema = Schema::number()
            .min(1.0, "rating must be greater than or equal to 1")
            .max(5.0, "rating must be less than or equal to 5");

        assert_eq!(
            schema.validate(&json!(0)).unwrap_err(),
            vec!["rating must be greater than or equal to 1"]
        );
        assert_eq!(
            schema.validate(&json!(6)).unwrap_err(),
            vec!["rating must be less than or equal to 5"]
        );
        assert!(schema.validate(&json!(3)).is_ok());
        assert!(schema.validate(&json!(1)).is_ok());
        assert!(schema.validate(&json!(5)).is_ok());
    }

    #[test]
    fn object_collects_field_violations_in_order() {
        let violations = upsert_schema().validate(&json!({})).unwrap_err();
        assert_eq!(
            violations,
            vec!["rating is a required field", "comment is a required field"]
        );
    }

    #[test]
    fn object_drops_undeclared_members() {
        let validated = upsert_schema()
            .validate(&json!({"rating": 5, "comment": "great", "extra": true}))
            .unwrap();
        assert_eq!(validated, json!({"rating": 5, "comment": "great"}));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let schema = Schema::object().optional_field("note", Schema::string());
        assert_eq!(schema.validate(&json!({})).unwrap(), json!({}));
        assert_eq!(
            schema.validate(&json!({"note": "hi"})).unwrap(),
            json!({"note": "hi"})
        );
        assert!(schema.validate(&json!({"note": 1})).is_err());
    }

    #[test]
    fn object_rejects_non_objects() {
        let schema = Schema::object().type_error("body must be an object type");
        assert_eq!(
            schema.validate(&json!("nope")).unwrap_err(),
            vec!["body must be an object type"]
        );
    }

    #[tokio::test]
    async fn pipe_reports_message_list() {
        let pipe = SchemaPipe::new(upsert_schema());
        let err = pipe.transform(json!({})).await.unwrap_err();
        assert_eq!(
            err.body()["message"],
            json!(["rating is a required field", "comment is a required field"])
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn pipe_override_message_wins() {
        let pipe = SchemaPipe::new(upsert_schema())
            .with_status(StatusCode::UNAUTHORIZED)
            .with_message("unauthorized");
        let err = pipe.transform(json!({})).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.body()["message"], "unauthorized");
    }

    #[tokio::test]
    async fn pipe_first_violation_only() {
        let pipe = SchemaPipe::new(upsert_schema()).first_violation_only();
        let err = pipe.transform(json!({})).await.unwrap_err();
        assert_eq!(err.body()["message"], "rating is a required field");
    }

    #[tokio::test]
    async fn pipe_passes_validated_value_through() {
        let pipe = SchemaPipe::new(upsert_schema());
        let value = pipe
            .transform(json!({"rating": 4, "comment": "fine"}))
            .await
            .unwrap();
        assert_eq!(value, json!({"rating": 4, "comment": "fine"}));
    }
}
