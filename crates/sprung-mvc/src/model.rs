//! Model attributes passed from handlers to views.
//!
//! A [`Model`] is the bag of named attributes a handler fills in for the
//! view layer, mirroring Spring MVC's `org.springframework.ui.Model`. Values
//! are held as [`Attr`], a small dynamic value type covering the shapes a
//! handler exposes: strings, integers, booleans, and bound records.

use std::collections::HashMap;
use std::fmt;

use sprung_core::SprungResult;
use sprung_http::HttpRequest;

use crate::bind::{self, Bindable, FromParam};

/// A dynamic model attribute value.
///
/// `Attr` covers the value shapes handlers put on the model. Bound records
/// become [`Attr::Record`], whose fields are reachable from views through
/// dotted paths (`baseVO.name`).
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    /// A string value.
    Str(String),
    /// A 64-bit integer.
    Int(i64),
    /// A boolean value.
    Bool(bool),
    /// A record with named fields, produced by binding a request.
    Record(HashMap<String, Attr>),
}

impl Attr {
    /// Converts this value to a display string, formatted the way JSP EL
    /// would render it: integers plainly, booleans as `true`/`false`.
    ///
    /// Record fields are sorted by name so the output is stable.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Record(fields) => {
                let mut entries: Vec<(&String, &Attr)> = fields.iter().collect();
                entries.sort_by_key(|(name, _)| *name);
                let inner: Vec<String> = entries
                    .iter()
                    .map(|(name, value)| format!("{name}={}", value.to_display_string()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
        }
    }

    /// Resolves one path segment on this value.
    ///
    /// Only records have addressable members; every other shape resolves to
    /// `None`.
    pub fn resolve_path(&self, key: &str) -> Option<&Attr> {
        match self {
            Self::Record(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Returns the string contents if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value if this is an `Int`.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a `Bool`.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the field map if this is a `Record`.
    pub const fn as_record(&self) -> Option<&HashMap<String, Attr>> {
        match self {
            Self::Record(fields) => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

// -- From implementations --

impl From<&str> for Attr {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Attr {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i32> for Attr {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Attr {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<usize> for Attr {
    fn from(i: usize) -> Self {
        Self::Int(i as i64)
    }
}

impl From<bool> for Attr {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<HashMap<String, Attr>> for Attr {
    fn from(fields: HashMap<String, Attr>) -> Self {
        Self::Record(fields)
    }
}

/// The attribute bag a handler fills in for the view layer.
///
/// Attributes are added by name and looked up from views through dotted
/// paths. A `Model` is created fresh for every dispatched request; nothing
/// carries over between requests.
///
/// # Examples
///
/// ```
/// use sprung_mvc::model::Model;
///
/// let mut model = Model::new();
/// model
///     .add_attribute("title", "Welcome")
///     .add_attribute("count", 3i64);
///
/// assert_eq!(model.get("title").unwrap().to_display_string(), "Welcome");
/// assert_eq!(model.get("count").unwrap().as_int(), Some(3));
/// assert!(model.get("missing").is_none());
/// ```
#[derive(Debug, Default)]
pub struct Model {
    attrs: HashMap<String, Attr>,
}

impl Model {
    /// Creates a new empty model.
    pub fn new() -> Self {
        Self {
            attrs: HashMap::new(),
        }
    }

    /// Adds an attribute under the given name, replacing any existing value.
    ///
    /// Returns `&mut Self` so calls chain the way Spring's
    /// `Model.addAttribute` does.
    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<Attr>) -> &mut Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Looks up an attribute by name.
    ///
    /// Supports dotted paths into record attributes, so `baseVO.name`
    /// resolves the `name` field of the record stored under `baseVO`.
    pub fn get(&self, path: &str) -> Option<&Attr> {
        let mut segments = path.split('.');
        let mut current = self.attrs.get(segments.next()?)?;
        for segment in segments {
            current = current.resolve_path(segment)?;
        }
        Some(current)
    }

    /// Returns `true` if a top-level attribute with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Returns the number of top-level attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns `true` if the model holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Iterates over the top-level attributes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Attr)> {
        self.attrs.iter()
    }

    /// Binds a record from the request parameters and exposes it on the
    /// model under the record's [`MODEL_KEY`](Bindable::MODEL_KEY).
    ///
    /// This is the command-object path: absent parameters keep the record's
    /// defaults, and the bound record is automatically visible to the view
    /// under its conventional name, the way Spring exposes a handler's
    /// command object.
    ///
    /// # Errors
    ///
    /// Returns `Binding` if a present parameter cannot be coerced to its
    /// declared field type.
    pub fn bind<T: Bindable>(&mut self, request: &HttpRequest) -> SprungResult<T> {
        let record = bind::bind_record::<T>(request)?;
        self.attrs.insert(T::MODEL_KEY.to_string(), record.to_attr());
        Ok(record)
    }

    /// Reads a required scalar parameter from the request, exposes it on
    /// the model under the parameter's name, and returns it.
    ///
    /// This is the `@RequestParam` path: unlike [`bind`](Self::bind), an
    /// absent parameter is an error rather than a default.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` if the parameter is absent, or `Binding`
    /// if it cannot be parsed as `T`.
    pub fn require<T>(&mut self, request: &HttpRequest, name: &str) -> SprungResult<T>
    where
        T: FromParam + Into<Attr> + Clone,
    {
        let value: T = bind::bind_scalar(request, name)?;
        self.attrs.insert(name.to_string(), value.clone().into());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sprung_core::SprungError;

    // ── Attr ────────────────────────────────────────────────────────────

    #[test]
    fn test_attr_display_strings() {
        assert_eq!(Attr::from("hello").to_display_string(), "hello");
        assert_eq!(Attr::from(42i64).to_display_string(), "42");
        assert_eq!(Attr::from(-7i32).to_display_string(), "-7");
        assert_eq!(Attr::from(true).to_display_string(), "true");
        assert_eq!(Attr::from(false).to_display_string(), "false");
    }

    #[test]
    fn test_attr_record_display_sorted() {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), Attr::from("alice"));
        fields.insert("id".to_string(), Attr::from(7i64));
        let record = Attr::Record(fields);
        assert_eq!(record.to_display_string(), "{id=7, name=alice}");
    }

    #[test]
    fn test_attr_accessors() {
        assert_eq!(Attr::from("x").as_str(), Some("x"));
        assert_eq!(Attr::from("x").as_int(), None);
        assert_eq!(Attr::from(5i64).as_int(), Some(5));
        assert_eq!(Attr::from(true).as_bool(), Some(true));
        assert!(Attr::from(5i64).as_record().is_none());
    }

    #[test]
    fn test_attr_resolve_path() {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), Attr::from("alice"));
        let record = Attr::Record(fields);
        assert_eq!(record.resolve_path("name").unwrap().as_str(), Some("alice"));
        assert!(record.resolve_path("missing").is_none());
        assert!(Attr::from("scalar").resolve_path("name").is_none());
    }

    #[test]
    fn test_attr_display_impl() {
        assert_eq!(format!("{}", Attr::from(9i64)), "9");
        assert_eq!(format!("{}", Attr::from("hi")), "hi");
    }

    // ── Model ───────────────────────────────────────────────────────────

    #[test]
    fn test_model_add_and_get() {
        let mut model = Model::new();
        model.add_attribute("greeting", "hello");
        assert_eq!(model.get("greeting").unwrap().as_str(), Some("hello"));
        assert!(model.contains("greeting"));
        assert!(!model.contains("other"));
        assert_eq!(model.len(), 1);
        assert!(!model.is_empty());
    }

    #[test]
    fn test_model_add_attribute_chains() {
        let mut model = Model::new();
        model
            .add_attribute("a", 1i64)
            .add_attribute("b", 2i64)
            .add_attribute("c", 3i64);
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn test_model_replace_attribute() {
        let mut model = Model::new();
        model.add_attribute("x", "first");
        model.add_attribute("x", "second");
        assert_eq!(model.get("x").unwrap().as_str(), Some("second"));
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_model_dotted_path_into_record() {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), Attr::from("alice"));
        fields.insert("id".to_string(), Attr::from(7i64));

        let mut model = Model::new();
        model.add_attribute("baseVO", Attr::Record(fields));

        assert_eq!(model.get("baseVO.name").unwrap().as_str(), Some("alice"));
        assert_eq!(model.get("baseVO.id").unwrap().as_int(), Some(7));
        assert!(model.get("baseVO.missing").is_none());
        assert!(model.get("other.name").is_none());
    }

    #[test]
    fn test_model_empty() {
        let model = Model::new();
        assert!(model.is_empty());
        assert_eq!(model.len(), 0);
        assert!(model.get("anything").is_none());
    }

    // ── require ─────────────────────────────────────────────────────────

    fn request_with_query(qs: &str) -> HttpRequest {
        HttpRequest::builder()
            .path("/vo3")
            .query_string(qs)
            .build()
            .unwrap()
    }

    #[test]
    fn test_require_present_int() {
        let request = request_with_query("num=42");
        let mut model = Model::new();
        let num: i64 = model.require(&request, "num").unwrap();
        assert_eq!(num, 42);
        assert_eq!(model.get("num").unwrap().as_int(), Some(42));
    }

    #[test]
    fn test_require_absent_is_missing_parameter() {
        let request = request_with_query("other=1");
        let mut model = Model::new();
        let err = model.require::<i64>(&request, "num").unwrap_err();
        assert!(matches!(
            err,
            SprungError::MissingParameter { ref field } if field == "num"
        ));
        assert_eq!(err.status_code(), 400);
        assert!(!model.contains("num"));
    }

    #[test]
    fn test_require_unparseable_is_binding_error() {
        let request = request_with_query("num=forty-two");
        let mut model = Model::new();
        let err = model.require::<i64>(&request, "num").unwrap_err();
        assert!(matches!(
            err,
            SprungError::Binding { ref field, .. } if field == "num"
        ));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_require_string_and_bool() {
        let request = request_with_query("name=alice&flag=on");
        let mut model = Model::new();
        let name: String = model.require(&request, "name").unwrap();
        let flag: bool = model.require(&request, "flag").unwrap();
        assert_eq!(name, "alice");
        assert!(flag);
        assert_eq!(model.get("flag").unwrap().as_bool(), Some(true));
    }
}
