//! ---
//! acts_section: "05-style-tables"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Declaration macro shared by the style tables."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---

/// Declare a table enum and its [`crate::StyleConstant`] impl.
///
/// `Number` tables take integer literals, `Str` tables take string literals.
macro_rules! style_table {
    (
        $(#[$meta:meta])*
        $name:ident: $kind:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::strum::Display,
            ::strum::EnumString,
            ::strum::EnumIter,
            ::strum::IntoStaticStr,
        )]
        #[strum(ascii_case_insensitive)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::StyleConstant for $name {
            const TABLE: $crate::StyleTable = $crate::StyleTable::$name;

            fn value(&self) -> $crate::StyleValue {
                match self {
                    $(Self::$variant => $crate::StyleValue::$kind($value)),+
                }
            }
        }
    };
}
