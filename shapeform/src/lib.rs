//! # shapeform
//!
//! Declarative data shapes that carry validation, presentation metadata and
//! named layouts together.
//!
//! ## Overview
//!
//! A schema is built from stateless factories ([`string`], [`number`],
//! [`boolean`], [`object`], [`array`], [`record`]). Object schemas can then be
//! decorated with static metadata, computed (possibly async) metadata hooks,
//! form and table layouts and an id field. Shape transformations
//! ([`omit`](ObjectSchema::omit), [`extend`](ObjectSchema::extend),
//! [`partial`](ObjectSchema::partial), [`catchall`](ObjectSchema::catchall),
//! [`passthrough`](ObjectSchema::passthrough)) derive new schemas and keep the
//! metadata and layouts in step with the new shape.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use shapeform::layout::{FormLayout, LayoutGroup};
//! use shapeform::{number, object, string, FieldMeta};
//!
//! let user = object([
//!     ("id", number()),
//!     ("name", string().with_meta(FieldMeta::new().with_label("Full name"))),
//!     ("email", string().optional()),
//! ])
//! .with_form_layouts([(
//!     "edit",
//!     FormLayout::new().group(LayoutGroup::titled("Contact").field("name").field("email")),
//! )]);
//!
//! let create = user.omit(["id"]);
//! let validator = create.compile_to_validator();
//! assert_eq!(
//!     validator.parse(&json!({"name": "Ada", "email": null})).unwrap(),
//!     json!({"name": "Ada", "email": null})
//! );
//! assert_eq!(create.layout("edit").unwrap().field_names(), vec!["name", "email"]);
//! ```
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`schema`] | Node hierarchy and the shape transformation engine |
//! | [`meta`] | Static [`FieldMeta`] and overlay rules |
//! | [`computed`] | Computed metadata hooks |
//! | [`layout`] | Form and table layouts |
//! | [`validator`] | Compiled validators |
//! | [`descriptor`] | JSON import and export of schemas |
//! | [`config`] | Validator options |
//! | [`error`] | Error types |
//!
//! ## Validation Semantics
//!
//! | Node | Accepts |
//! |------|---------|
//! | `string()` | JSON strings |
//! | `number()` | JSON numbers |
//! | `boolean()` | `true` / `false` |
//! | `.optional()` | the wrapped type, `null`, or a missing key |
//! | `object(..)` | objects; undeclared keys are dropped unless `catchall` / `passthrough` |
//! | `array(T)` | arrays of `T`; issues name the index |
//! | `record(T)` | objects whose every value is `T` |

pub mod computed;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod factory;
pub mod layout;
pub mod meta;
mod resolve;
pub mod schema;
pub mod validator;

pub use config::{ArrayErrors, PathStyle, ValidatorOptions};
pub use descriptor::SchemaDescriptor;
pub use error::{
    Issue, MetaError, MetaResult, ParseResult, SchemaError, SchemaResult, ValidationError,
};
pub use factory::{array, boolean, number, object, record, string};
pub use meta::{FieldMeta, FieldValidator};
pub use schema::{ObjectSchema, Schema, SchemaType, Shape};
pub use validator::{ParseOutcome, Validator};

/// Build a [`Shape`] from `"name" => schema` pairs.
///
/// ```rust
/// use shapeform::{number, shape, string, ObjectSchema};
///
/// let user = ObjectSchema::new(shape! {
///     "id" => number(),
///     "name" => string(),
/// });
/// assert_eq!(user.keys(), vec!["id", "name"]);
/// ```
#[macro_export]
macro_rules! shape {
    ($($name:expr => $schema:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut shape = $crate::Shape::new();
        $(shape.insert($name, $schema);)*
        shape
    }};
}
