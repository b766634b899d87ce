//! ---
//! acts_section: "05-style-tables"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Style constant tables and name lookup."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
//! Symbolic names used by declarative UI markup, mapped to the numbers and
//! strings the renderer consumes. Tables are closed enums; nothing here is
//! mutable at runtime.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

#[macro_use]
mod macros;
pub mod tables;

pub use tables::{
    Color, Curve, FontWeight, GestureMode, GradientDirection, HoverEffect, TextAlign,
};

/// Value stored against a symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(i64),
    Str(&'static str),
}

impl std::fmt::Display for StyleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleValue::Number(value) => write!(f, "{value}"),
            StyleValue::Str(value) => f.write_str(value),
        }
    }
}

/// One name/value pair of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleEntry {
    pub name: &'static str,
    pub value: StyleValue,
}

/// The available tables.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum StyleTable {
    Color,
    TextAlign,
    FontWeight,
    Curve,
    GestureMode,
    GradientDirection,
    HoverEffect,
}

/// Implemented by every table enum.
pub trait StyleConstant: Copy + IntoEnumIterator + Into<&'static str> {
    /// Table the constant belongs to.
    const TABLE: StyleTable;

    /// Value the renderer receives for this constant.
    fn value(&self) -> StyleValue;

    /// Symbolic name as written in markup.
    fn name(&self) -> &'static str {
        (*self).into()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("unknown style table '{0}'")]
    UnknownTable(String),
    #[error("'{name}' is not a member of {table}")]
    UnknownName { table: StyleTable, name: String },
}

/// Resolve `name` inside `table`. Names match case-insensitively.
pub fn lookup(table: StyleTable, name: &str) -> Result<StyleValue, StyleError> {
    let found = match table {
        StyleTable::Color => resolve::<Color>(name),
        StyleTable::TextAlign => resolve::<TextAlign>(name),
        StyleTable::FontWeight => resolve::<FontWeight>(name),
        StyleTable::Curve => resolve::<Curve>(name),
        StyleTable::GestureMode => resolve::<GestureMode>(name),
        StyleTable::GradientDirection => resolve::<GradientDirection>(name),
        StyleTable::HoverEffect => resolve::<HoverEffect>(name),
    };
    found.ok_or_else(|| StyleError::UnknownName {
        table,
        name: name.to_owned(),
    })
}

/// Parse a table name, then resolve `name` inside it.
pub fn lookup_by_name(table: &str, name: &str) -> Result<StyleValue, StyleError> {
    let table = table
        .parse::<StyleTable>()
        .map_err(|_| StyleError::UnknownTable(table.to_owned()))?;
    lookup(table, name)
}

/// Every entry of `table`, in declaration order.
pub fn entries(table: StyleTable) -> Vec<StyleEntry> {
    match table {
        StyleTable::Color => collect::<Color>(),
        StyleTable::TextAlign => collect::<TextAlign>(),
        StyleTable::FontWeight => collect::<FontWeight>(),
        StyleTable::Curve => collect::<Curve>(),
        StyleTable::GestureMode => collect::<GestureMode>(),
        StyleTable::GradientDirection => collect::<GradientDirection>(),
        StyleTable::HoverEffect => collect::<HoverEffect>(),
    }
}

fn resolve<T>(name: &str) -> Option<StyleValue>
where
    T: StyleConstant + std::str::FromStr,
{
    name.parse::<T>().ok().map(|constant| constant.value())
}

fn collect<T: StyleConstant>() -> Vec<StyleEntry> {
    T::iter()
        .map(|constant| StyleEntry {
            name: constant.name(),
            value: constant.value(),
        })
        .collect()
}
