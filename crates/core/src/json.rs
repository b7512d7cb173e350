//! Request-body cleanup applied by transports before a body goes on the wire.

use serde_json::Value;

/// Drop `null` object members at every depth, in place.
///
/// Routers reject some explicit nulls (an unset `provider.order`, a `seed`
/// left as `null` by `extraBody`), so unset options are omitted instead.
/// Null array elements are kept: tool arguments and message lists are
/// positional.
pub fn strip_null_members(value: &mut Value) {
    match value {
        Value::Object(members) => {
            members.retain(|_, member| !member.is_null());
            members.values_mut().for_each(strip_null_members);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_null_members),
        _ => {}
    }
}

/// Copy of `body` with [`strip_null_members`] applied.
pub fn without_null_fields(body: &Value) -> Value {
    let mut body = body.clone();
    strip_null_members(&mut body);
    body
}
