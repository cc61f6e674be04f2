//! # tfaddr - terraform resource addresses
//!
//! Parse resource address strings into an [Address] and render them back to their canonical form.
//!
//! ## Address anatomy
//!
//! ```text
//! module.network["eu"].module.subnet[0].data.aws_subnet.private[1]
//! \__________________/ \______________/ \___/\________/\______/\_/
//!        module              module      mode   type     name  index
//! ```
//!
//! - zero or more `module.<name>` segments, each optionally indexed ([ModulePath], outer-most first)
//! - an optional `data.` marking a read-only data resource ([ResourceMode])
//! - `<type>.<name>`, optionally indexed ([ResourceSpec])
//!
//! An index ([Index]) is an integer (`[0]`, `[-1]`) or a double quoted string (`["eu"]`).
//! Inside a quoted string a backslash makes the following character literal, so `\"` is a quote,
//! `\\` a backslash and `\n` just `n`. Rendering escapes only `"` and `\`.
//!
//! ## Parsing and rendering
//!
//! ```
//! let address = tfaddr::parse(r#"module.a["x"].foo.bar[0]"#).unwrap();
//! assert_eq!(address.resource.resource_type, "foo");
//! assert_eq!(address.to_string(), r#"module.a["x"].foo.bar[0]"#);
//! ```
//!
//! Rendering a parsed address gives back the input as long as the input was canonical. Inputs
//! like `[007]` or `["\a"]` are accepted but render as `[7]` and `["a"]`.
//!
//! Keywords are only keywords where the grammar expects them: `module.module` is a resource of
//! type `module` and `module.data.data.data` a resource `data.data` inside module `data`.
//!
//! ## Tooling
//!
//! [check] validates files of addresses line by line, [edit::AddressEdit] derives a new address
//! from an existing one and rejects edits that no longer render as a valid address.
//!
//! ## HCL
//!
//! The [hcl_interop] module converts addresses from and to [hcl::Traversal]s and reads the `moved` blocks
//! of terraform configuration files.
pub mod address;
pub mod check;
pub mod edit;
pub mod error;
pub mod hcl_interop;
mod parser;

pub use address::{Address, Index, Module, ModulePath, ResourceMode, ResourceSpec};
pub use error::{SyntaxError, SyntaxErrorKind};
pub use parser::parse;
