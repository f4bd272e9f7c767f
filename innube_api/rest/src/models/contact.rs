use anyhow::Context;
use innube_models::contact::{ContactSubmission, ContactSubmissionError};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Raw contact form fields. Unknown fields are ignored. `null`, `false`, `0`
/// and `""` count as missing, other values are taken in their text form.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ApiContactSubmission {
    /// Full name of the sender
    #[serde(default, rename = "nombre", deserialize_with = "string_field")]
    pub name: Option<String>,
    /// Email address of the sender, used as reply-to
    #[serde(default, rename = "correo", deserialize_with = "string_field")]
    pub email: Option<String>,
    /// Subject of the message
    #[serde(default, rename = "asunto", deserialize_with = "string_field")]
    pub subject: Option<String>,
    /// Content of the message
    #[serde(default, rename = "mensaje", deserialize_with = "string_field")]
    pub message: Option<String>,
    /// Service the sender is interested in
    #[serde(default, rename = "servicio", deserialize_with = "string_field")]
    pub service: Option<String>,
}

impl ApiContactSubmission {
    /// Decodes a request body according to its content type.
    ///
    /// Urlencoded bodies are decoded as html form fields, everything else as
    /// json. An empty body counts as an empty form. A json body holding a
    /// string is decoded once more.
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> anyhow::Result<Self> {
        if body.trim_ascii().is_empty() {
            return Ok(Self::default());
        }

        if content_type.is_some_and(is_form_content_type) {
            return serde_urlencoded::from_bytes(body).context("Failed to decode form body");
        }

        let value = match serde_json::from_slice::<Value>(body).context("Failed to decode request body")? {
            Value::String(encoded) => {
                serde_json::from_str::<Value>(&encoded).context("Failed to decode request body string")?
            }
            value => value,
        };

        match value {
            Value::Object(_) => serde_json::from_value(value).map_err(Into::into),
            _ => Ok(Self::default()),
        }
    }
}

impl TryFrom<ApiContactSubmission> for ContactSubmission {
    type Error = ContactSubmissionError;

    fn try_from(value: ApiContactSubmission) -> Result<Self, Self::Error> {
        Self::from_fields(
            value.name,
            value.email,
            value.subject,
            value.message,
            value.service,
        )
    }
}

fn is_form_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

fn string_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".into()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::Number(number) => Some(number.to_string()),
        Value::String(value) => Some(value),
        value @ (Value::Array(_) | Value::Object(_)) => Some(value.to_string()),
    })
}
