//! Parameter binding: coercing request parameters into typed records.
//!
//! A handler declares the shape of its command object by implementing
//! [`Bindable`]: a list of [`FieldSpec`]s naming each field and its
//! [`FieldKind`]. [`bind_record`] walks the declared fields, coerces the
//! matching request parameters, and fills in a record, mirroring how Spring
//! MVC's `WebDataBinder` populates a handler's command object.
//!
//! Binding is permissive about absence: a parameter that is missing or
//! empty keeps the record's default for that field. A parameter that is
//! present but cannot be coerced fails the whole bind.

use sprung_core::{SprungError, SprungResult};
use sprung_http::HttpRequest;

use crate::model::Attr;

/// The type a declared field coerces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A string field. Any parameter value is accepted verbatim.
    Str,
    /// A 64-bit integer field.
    Int,
    /// A boolean field, parsed from the usual truthy and falsy spellings.
    Bool,
}

/// A single declared field of a [`Bindable`] record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// The parameter name this field binds from.
    pub name: &'static str,
    /// The type the raw parameter value is coerced to.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Creates a new field spec.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// A coerced field value, ready to be applied to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A coerced string.
    Str(String),
    /// A coerced integer.
    Int(i64),
    /// A coerced boolean.
    Bool(bool),
}

impl From<FieldValue> for Attr {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Str(s) => Self::Str(s),
            FieldValue::Int(i) => Self::Int(i),
            FieldValue::Bool(b) => Self::Bool(b),
        }
    }
}

/// Coerces a raw parameter value to the field's declared kind.
///
/// # Errors
///
/// Returns `Binding` naming the field if the value does not parse as the
/// declared kind.
pub fn coerce(spec: &FieldSpec, raw: &str) -> SprungResult<FieldValue> {
    match spec.kind {
        FieldKind::Str => Ok(FieldValue::Str(raw.to_string())),
        FieldKind::Int => raw
            .trim()
            .parse::<i64>()
            .map(FieldValue::Int)
            .map_err(|_| SprungError::Binding {
                field: spec.name.to_string(),
                reason: format!("'{raw}' is not a whole number"),
            }),
        FieldKind::Bool => parse_bool(raw).map(FieldValue::Bool).ok_or_else(|| {
            SprungError::Binding {
                field: spec.name.to_string(),
                reason: format!("'{raw}' is not a boolean"),
            }
        }),
    }
}

/// Parses the accepted boolean spellings.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A record type that can be populated from request parameters.
///
/// Implementations declare their fields up front; there is no reflection
/// and no derive. Binding visits exactly the declared fields in order and
/// routes each coerced value through [`apply`](Bindable::apply).
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use sprung_mvc::bind::{Bindable, FieldKind, FieldSpec, FieldValue};
/// use sprung_mvc::model::Attr;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct BaseVO {
///     name: String,
///     id: i64,
/// }
///
/// impl Bindable for BaseVO {
///     const MODEL_KEY: &'static str = "baseVO";
///     const FIELDS: &'static [FieldSpec] = &[
///         FieldSpec::new("name", FieldKind::Str),
///         FieldSpec::new("id", FieldKind::Int),
///     ];
///
///     fn apply(&mut self, name: &str, value: FieldValue) {
///         match (name, value) {
///             ("name", FieldValue::Str(s)) => self.name = s,
///             ("id", FieldValue::Int(i)) => self.id = i,
///             _ => {}
///         }
///     }
///
///     fn to_attr(&self) -> Attr {
///         let mut fields = HashMap::new();
///         fields.insert("name".to_string(), Attr::from(self.name.as_str()));
///         fields.insert("id".to_string(), Attr::from(self.id));
///         Attr::Record(fields)
///     }
/// }
/// ```
pub trait Bindable: Default {
    /// The name the bound record is exposed under on the model.
    ///
    /// By convention this is the decapitalized type name, matching how
    /// Spring derives a command object's model attribute name.
    const MODEL_KEY: &'static str;

    /// The declared fields, visited in order during binding.
    const FIELDS: &'static [FieldSpec];

    /// Applies one coerced value to the record.
    ///
    /// Called only with names from [`FIELDS`](Bindable::FIELDS) and values
    /// already coerced to the declared kind.
    fn apply(&mut self, name: &str, value: FieldValue);

    /// Converts the record into a model attribute for view access.
    fn to_attr(&self) -> Attr;
}

/// Binds a record from the request's parameters.
///
/// Query parameters and form body parameters are both consulted, query
/// first. Absent and empty parameters keep the record's default for that
/// field.
///
/// # Errors
///
/// Returns `Binding` if a present, non-empty parameter fails coercion.
pub fn bind_record<T: Bindable>(request: &HttpRequest) -> SprungResult<T> {
    let mut record = T::default();
    for spec in T::FIELDS {
        match request.param(spec.name) {
            None => {}
            Some(raw) if raw.is_empty() => {}
            Some(raw) => record.apply(spec.name, coerce(spec, raw)?),
        }
    }
    Ok(record)
}

/// Binds a required scalar from a single request parameter.
///
/// This is the strict counterpart to [`bind_record`]: where a record keeps
/// its defaults for absent parameters, a scalar must be present.
///
/// # Errors
///
/// Returns `MissingParameter` if the parameter is absent, or `Binding` if
/// it does not parse as `T`.
pub fn bind_scalar<T: FromParam>(request: &HttpRequest, name: &str) -> SprungResult<T> {
    let raw = request
        .param(name)
        .ok_or_else(|| SprungError::MissingParameter {
            field: name.to_string(),
        })?;
    T::from_param(raw).ok_or_else(|| SprungError::Binding {
        field: name.to_string(),
        reason: format!("'{raw}' is not {}", T::EXPECTED),
    })
}

/// A scalar type parseable from a single request parameter.
///
/// This is the `@RequestParam` counterpart to [`Bindable`]: where a record
/// binds permissively, a scalar read through [`bind_scalar`] or
/// [`Model::require`](crate::model::Model::require) demands presence.
pub trait FromParam: Sized {
    /// What a value of this type looks like, for bind failure messages.
    const EXPECTED: &'static str;

    /// Parses the raw parameter value, or `None` if it does not conform.
    fn from_param(raw: &str) -> Option<Self>;
}

impl FromParam for String {
    const EXPECTED: &'static str = "a string";

    fn from_param(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl FromParam for i64 {
    const EXPECTED: &'static str = "a whole number";

    fn from_param(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl FromParam for bool {
    const EXPECTED: &'static str = "a boolean";

    fn from_param(raw: &str) -> Option<Self> {
        parse_bool(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    #[derive(Debug, Default, PartialEq)]
    struct TestVO {
        name: String,
        id: i64,
        active: bool,
    }

    impl Bindable for TestVO {
        const MODEL_KEY: &'static str = "testVO";
        const FIELDS: &'static [FieldSpec] = &[
            FieldSpec::new("name", FieldKind::Str),
            FieldSpec::new("id", FieldKind::Int),
            FieldSpec::new("active", FieldKind::Bool),
        ];

        fn apply(&mut self, name: &str, value: FieldValue) {
            match (name, value) {
                ("name", FieldValue::Str(s)) => self.name = s,
                ("id", FieldValue::Int(i)) => self.id = i,
                ("active", FieldValue::Bool(b)) => self.active = b,
                _ => {}
            }
        }

        fn to_attr(&self) -> Attr {
            let mut fields = HashMap::new();
            fields.insert("name".to_string(), Attr::from(self.name.as_str()));
            fields.insert("id".to_string(), Attr::from(self.id));
            fields.insert("active".to_string(), Attr::from(self.active));
            Attr::Record(fields)
        }
    }

    fn get_request(qs: &str) -> HttpRequest {
        HttpRequest::builder()
            .path("/vo")
            .query_string(qs)
            .build()
            .unwrap()
    }

    // ── coerce ──────────────────────────────────────────────────────────

    #[test]
    fn test_coerce_str_is_verbatim() {
        let spec = FieldSpec::new("name", FieldKind::Str);
        assert_eq!(
            coerce(&spec, "  spaced  ").unwrap(),
            FieldValue::Str("  spaced  ".to_string())
        );
    }

    #[test]
    fn test_coerce_int_valid() {
        let spec = FieldSpec::new("id", FieldKind::Int);
        assert_eq!(coerce(&spec, "42").unwrap(), FieldValue::Int(42));
        assert_eq!(coerce(&spec, " -7 ").unwrap(), FieldValue::Int(-7));
    }

    #[test]
    fn test_coerce_int_invalid_names_field() {
        let spec = FieldSpec::new("id", FieldKind::Int);
        let err = coerce(&spec, "abc").unwrap_err();
        assert!(matches!(
            err,
            SprungError::Binding { ref field, .. } if field == "id"
        ));
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn test_coerce_bool_spellings() {
        let spec = FieldSpec::new("active", FieldKind::Bool);
        for raw in ["true", "1", "yes", "on", "TRUE", "On"] {
            assert_eq!(coerce(&spec, raw).unwrap(), FieldValue::Bool(true));
        }
        for raw in ["false", "0", "no", "off", "FALSE"] {
            assert_eq!(coerce(&spec, raw).unwrap(), FieldValue::Bool(false));
        }
    }

    #[test]
    fn test_coerce_bool_invalid() {
        let spec = FieldSpec::new("active", FieldKind::Bool);
        assert!(coerce(&spec, "maybe").is_err());
    }

    // ── bind_record ─────────────────────────────────────────────────────

    #[test]
    fn test_bind_record_all_fields_present() {
        let request = get_request("name=alice&id=7&active=true");
        let vo: TestVO = bind_record(&request).unwrap();
        assert_eq!(
            vo,
            TestVO {
                name: "alice".to_string(),
                id: 7,
                active: true,
            }
        );
    }

    #[test]
    fn test_bind_record_absent_fields_keep_defaults() {
        let request = get_request("name=bob");
        let vo: TestVO = bind_record(&request).unwrap();
        assert_eq!(vo.name, "bob");
        assert_eq!(vo.id, 0);
        assert!(!vo.active);
    }

    #[test]
    fn test_bind_record_no_parameters_is_all_defaults() {
        let request = get_request("");
        let vo: TestVO = bind_record(&request).unwrap();
        assert_eq!(vo, TestVO::default());
    }

    #[test]
    fn test_bind_record_empty_value_keeps_default() {
        let request = get_request("id=&name=carol");
        let vo: TestVO = bind_record(&request).unwrap();
        assert_eq!(vo.id, 0);
        assert_eq!(vo.name, "carol");
    }

    #[test]
    fn test_bind_record_bad_int_fails_bind() {
        let request = get_request("name=alice&id=seven");
        let err = bind_record::<TestVO>(&request).unwrap_err();
        assert!(matches!(
            err,
            SprungError::Binding { ref field, .. } if field == "id"
        ));
    }

    #[test]
    fn test_bind_record_ignores_undeclared_parameters() {
        let request = get_request("name=alice&unexpected=zzz");
        let vo: TestVO = bind_record(&request).unwrap();
        assert_eq!(vo.name, "alice");
    }

    #[test]
    fn test_bind_record_from_form_body() {
        let request = HttpRequest::builder()
            .method(http::Method::POST)
            .path("/vo")
            .content_type("application/x-www-form-urlencoded")
            .body(b"name=dave&id=12".to_vec())
            .build()
            .unwrap();
        let vo: TestVO = bind_record(&request).unwrap();
        assert_eq!(vo.name, "dave");
        assert_eq!(vo.id, 12);
    }

    #[test]
    fn test_to_attr_round_trip() {
        let vo = TestVO {
            name: "alice".to_string(),
            id: 7,
            active: true,
        };
        let attr = vo.to_attr();
        assert_eq!(attr.resolve_path("name").unwrap().as_str(), Some("alice"));
        assert_eq!(attr.resolve_path("id").unwrap().as_int(), Some(7));
        assert_eq!(attr.resolve_path("active").unwrap().as_bool(), Some(true));
    }

    // ── bind_scalar ─────────────────────────────────────────────────────

    #[test]
    fn test_bind_scalar_present() {
        let request = get_request("num=1234");
        let num: i64 = bind_scalar(&request, "num").unwrap();
        assert_eq!(num, 1234);
    }

    #[test]
    fn test_bind_scalar_absent_is_missing_parameter() {
        let request = get_request("");
        let err = bind_scalar::<i64>(&request, "num").unwrap_err();
        assert!(matches!(
            err,
            SprungError::MissingParameter { ref field } if field == "num"
        ));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_bind_scalar_unparseable_is_binding_error() {
        let request = get_request("num=lots");
        let err = bind_scalar::<i64>(&request, "num").unwrap_err();
        assert!(matches!(
            err,
            SprungError::Binding { ref field, .. } if field == "num"
        ));
        assert!(err.to_string().contains("whole number"));
    }

    #[test]
    fn test_bind_scalar_prefers_query_over_form() {
        let request = HttpRequest::builder()
            .method(http::Method::POST)
            .path("/vo3")
            .query_string("num=1")
            .content_type("application/x-www-form-urlencoded")
            .body(b"num=2".to_vec())
            .build()
            .unwrap();
        let num: i64 = bind_scalar(&request, "num").unwrap();
        assert_eq!(num, 1);
    }

    // ── FromParam ───────────────────────────────────────────────────────

    #[test]
    fn test_from_param_string() {
        assert_eq!(String::from_param("anything"), Some("anything".to_string()));
    }

    #[test]
    fn test_from_param_i64() {
        assert_eq!(i64::from_param("99"), Some(99));
        assert_eq!(i64::from_param(" 99 "), Some(99));
        assert_eq!(i64::from_param("ninety-nine"), None);
    }

    #[test]
    fn test_from_param_bool() {
        assert_eq!(bool::from_param("on"), Some(true));
        assert_eq!(bool::from_param("off"), Some(false));
        assert_eq!(bool::from_param("sometimes"), None);
    }
}
