//! The tour controller: one handler per request-mapping idiom.
//!
//! Written the way a Spring `@Controller` class reads: named handler
//! functions, a command object (`BaseVO`) bound from request parameters,
//! and view names returned as plain strings. Handlers that return
//! [`DispatchResult::NoBody`] get their view named after the request path.

use std::collections::HashMap;

use sprung_core::SprungResult;
use sprung_http::HttpRequest;
use sprung_mvc::bind::{Bindable, FieldKind, FieldSpec, FieldValue};
use sprung_mvc::dispatch::DispatchResult;
use sprung_mvc::model::{Attr, Model};
use sprung_mvc::routes::Controller;

/// The command object bound from request parameters.
///
/// Fields are matched by name against query parameters first, then form
/// fields; absent parameters keep the defaults. Views reach the record
/// under `baseVO`, as `${baseVO.name}` and `${baseVO.id}`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BaseVO {
    pub name: String,
    pub id: i64,
}

impl Bindable for BaseVO {
    const MODEL_KEY: &'static str = "baseVO";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", FieldKind::Str),
        FieldSpec::new("id", FieldKind::Int),
    ];

    fn apply(&mut self, name: &str, value: FieldValue) {
        match (name, value) {
            ("name", FieldValue::Str(s)) => self.name = s,
            ("id", FieldValue::Int(i)) => self.id = i,
            _ => {}
        }
    }

    fn to_attr(&self) -> Attr {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), Attr::from(self.name.as_str()));
        fields.insert("id".to_string(), Attr::from(self.id));
        Attr::Record(fields)
    }
}

/// Builds the controller carrying every route of the tour.
pub fn routes() -> Controller {
    Controller::new("")
        .any("/", home)
        .any("/base", base)
        .get("/baseGet", base_get)
        .post("/basePost", base_post)
        .get("/letsGet", lets_get)
        .get("/vo", vo01)
        .get("/vo2", vo02)
        .get("/vo3", vo03)
        .get("/qwer", redirect_home)
        .get("/exUpload", ex_upload)
        .post("/exUploadPost", ex_upload_post)
}

/// Handler for `ANY /` - the application root, rendered as `index`.
fn home(_req: &HttpRequest, _model: &mut Model) -> SprungResult<DispatchResult> {
    tracing::info!("Accessed the application root");
    Ok(DispatchResult::NoBody)
}

/// Handler for `ANY /base` - reachable by GET and POST alike.
fn base(_req: &HttpRequest, _model: &mut Model) -> SprungResult<DispatchResult> {
    tracing::info!("base answers GET and POST");
    Ok(DispatchResult::NoBody)
}

/// Handler for `GET /baseGet` - GET only.
fn base_get(_req: &HttpRequest, _model: &mut Model) -> SprungResult<DispatchResult> {
    tracing::info!("base get!");
    Ok(DispatchResult::NoBody)
}

/// Handler for `POST /basePost` - not reachable by just browsing.
fn base_post(_req: &HttpRequest, _model: &mut Model) -> SprungResult<DispatchResult> {
    tracing::info!("a post you cannot reach from the address bar");
    Ok(DispatchResult::NoBody)
}

/// Handler for `GET /letsGet` - GET only.
fn lets_get(_req: &HttpRequest, _model: &mut Model) -> SprungResult<DispatchResult> {
    tracing::info!("Called with GET");
    Ok(DispatchResult::NoBody)
}

/// Handler for `GET /vo` - binds the command object and renders `vo01`.
fn vo01(req: &HttpRequest, model: &mut Model) -> SprungResult<DispatchResult> {
    let vo = model.bind::<BaseVO>(req)?;
    tracing::info!("Bound command object: {vo:?}");
    Ok(DispatchResult::view("vo01"))
}

/// Handler for `GET /vo2` - binds the record, re-exposes it under an
/// explicit attribute name, and renders the nested view `spring/vo02`.
fn vo02(req: &HttpRequest, model: &mut Model) -> SprungResult<DispatchResult> {
    let vo = model.bind::<BaseVO>(req)?;
    tracing::info!("Bound command object: {vo:?}");
    model.add_attribute("BaseVO", vo.to_attr());
    Ok(DispatchResult::view("spring/vo02"))
}

/// Handler for `GET /vo3` - binds the record plus a required integer
/// parameter `num`; the request fails when `num` is absent.
fn vo03(req: &HttpRequest, model: &mut Model) -> SprungResult<DispatchResult> {
    model.bind::<BaseVO>(req)?;
    let num: i64 = model.require(req, "num")?;
    tracing::info!("Required number: {num}");
    Ok(DispatchResult::view("spring/vo03"))
}

/// Handler for `GET /qwer` - redirects to the application root.
fn redirect_home(_req: &HttpRequest, _model: &mut Model) -> SprungResult<DispatchResult> {
    tracing::info!("Redirecting to the application root");
    Ok(DispatchResult::view("redirect:/"))
}

/// Handler for `GET /exUpload` - renders the upload form.
fn ex_upload(_req: &HttpRequest, _model: &mut Model) -> SprungResult<DispatchResult> {
    tracing::info!("Rendering the upload form");
    Ok(DispatchResult::NoBody)
}

/// Handler for `POST /exUploadPost` - logs every uploaded file and
/// reports how many arrived.
fn ex_upload_post(req: &HttpRequest, model: &mut Model) -> SprungResult<DispatchResult> {
    let files = req.files_for("files");
    for file in &files {
        tracing::info!("name: {}", file.name);
        tracing::info!("size: {}", file.size);
    }
    model.add_attribute("fileCount", files.len());
    Ok(DispatchResult::NoBody)
}
