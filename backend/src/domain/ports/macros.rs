//! Helper macro for declaring port error enums.
//!
//! Every variant carries named fields and a display template. The macro
//! derives `thiserror::Error` and emits a snake_case constructor per variant
//! whose parameters accept anything convertible into the field type.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),* },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build a [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                }
            )+
        }
    };
}

pub(crate) use define_port_error;
