//! Copying item values into tagged struct fields
//!
//! A destination describes its writable fields as a list of
//! [`FieldBinding`]s: field name, mapping tag, and a typed slot to write into.
//! `#[derive(Populate)]` builds that list from `#[opfield("key")]` attributes;
//! hand-written [`Populate`] impls build it directly.

use crate::{Error, KeyConvention, Result};
use opfield_connect::ItemValues;
use std::num::ParseIntError;
use std::str::FromStr;

type IntegerSetter<'a> = Box<dyn FnMut(&str) -> std::result::Result<(), ParseIntError> + 'a>;

enum Target<'a> {
    Text(&'a mut String),
    Integer(IntegerSetter<'a>),
    Unsupported(&'static str),
    ReadOnly,
}

/// One tagged field of a destination.
pub struct FieldBinding<'a> {
    field: &'static str,
    tag: &'a str,
    target: Target<'a>,
}

impl<'a> FieldBinding<'a> {
    /// A `String` field; the item value is copied verbatim.
    #[must_use]
    pub fn text(field: &'static str, tag: &'a str, target: &'a mut String) -> Self {
        Self {
            field,
            tag,
            target: Target::Text(target),
        }
    }

    /// An integer field; the item value is parsed base-10.
    #[must_use]
    pub fn integer<T>(field: &'static str, tag: &'a str, target: &'a mut T) -> Self
    where
        T: FromStr<Err = ParseIntError> + 'a,
    {
        let setter = move |raw: &str| -> std::result::Result<(), ParseIntError> {
            *target = raw.parse()?;
            Ok(())
        };
        Self {
            field,
            tag,
            target: Target::Integer(Box::new(setter)),
        }
    }

    /// A tagged field whose type cannot be populated.
    #[must_use]
    pub fn unsupported(field: &'static str, tag: &'a str, type_name: &'static str) -> Self {
        Self {
            field,
            tag,
            target: Target::Unsupported(type_name),
        }
    }

    /// A tagged field the destination does not allow writing.
    #[must_use]
    pub fn read_only(field: &'static str, tag: &'a str) -> Self {
        Self {
            field,
            tag,
            target: Target::ReadOnly,
        }
    }

    /// Field name on the destination.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Mapping tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.tag
    }
}

impl std::fmt::Debug for FieldBinding<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let target = match &self.target {
            Target::Text(_) => "text",
            Target::Integer(_) => "integer",
            Target::Unsupported(type_name) => *type_name,
            Target::ReadOnly => "read-only",
        };
        f.debug_struct("FieldBinding")
            .field("field", &self.field)
            .field("tag", &self.tag)
            .field("target", &target)
            .finish()
    }
}

/// A struct that item values can be loaded into.
///
/// Usually derived. Tagged fields must be `String` or a primitive integer;
/// any other tagged type compiles but fails at population time with
/// [`Error::UnsupportedType`].
///
/// ```ignore
/// #[derive(opfield::Populate)]
/// struct Database {
///     #[opfield("host")]
///     host: String,
///     #[opfield("port")]
///     port: u16,
/// }
/// ```
///
/// Only structs with named fields can derive it:
///
/// ```compile_fail
/// #[derive(opfield::Populate)]
/// enum Database {
///     Primary,
///     Replica,
/// }
/// ```
///
/// ```compile_fail
/// #[derive(opfield::Populate)]
/// struct Database(#[opfield("host")] String);
/// ```
pub trait Populate {
    /// Tagged fields in declaration order.
    fn bindings(&mut self) -> Vec<FieldBinding<'_>>;
}

/// Copy values from `item` into the tagged fields of `dest`.
///
/// Fields are written in declaration order. On failure, fields written
/// before the failing one keep their new values.
///
/// # Errors
///
/// - [`Error::Configuration`] if any binding has an empty tag (checked
///   before anything is written)
/// - [`Error::UnsupportedType`] for a tagged field of another type
/// - [`Error::InvalidInteger`] if an integer field's value does not parse
/// - [`Error::ReadOnlyField`] for a read-only binding
pub fn populate<S, T>(item: &S, dest: &mut T, convention: &KeyConvention) -> Result<()>
where
    S: ItemValues + ?Sized,
    T: Populate + ?Sized,
{
    let bindings = dest.bindings();
    if let Some(binding) = bindings.iter().find(|b| b.tag.is_empty()) {
        return Err(Error::Configuration {
            message: format!("field {} has an empty mapping tag", binding.field),
        });
    }

    let count = bindings.len();
    for binding in bindings {
        let key = convention.key_for(binding.tag);
        match binding.target {
            Target::Text(slot) => *slot = item.get_value(&key),
            Target::Integer(mut set) => {
                let raw = item.get_value(&key);
                if let Err(source) = set(&raw) {
                    return Err(Error::InvalidInteger {
                        field: binding.field,
                        value: raw,
                        source,
                    });
                }
            }
            Target::Unsupported(type_name) => {
                return Err(Error::UnsupportedType {
                    field: binding.field,
                    type_name,
                });
            }
            Target::ReadOnly => {
                return Err(Error::ReadOnlyField {
                    field: binding.field,
                });
            }
        }
        tracing::trace!(field = binding.field, key = %key, "Populated field");
    }

    tracing::debug!(fields = count, "Populated destination from item");
    Ok(())
}
