use serde::{ser::SerializeStruct, Serialize, Serializer};

pub mod contact;

/// Body of every json response: `{"ok": true, "result": ...}` or
/// `{"ok": false, "message": ...}`.
#[derive(Debug)]
pub enum ApiResult<T> {
    Ok(T),
    Err(&'static str),
}

impl<T: Serialize> Serialize for ApiResult<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ApiResult", 2)?;
        match self {
            Self::Ok(result) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("result", result)?;
            }
            Self::Err(message) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("message", message)?;
            }
        }
        state.end()
    }
}
