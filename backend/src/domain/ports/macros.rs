//! Macro support for the port error enums.
//!
//! Every driven port exposes a thiserror enum whose variants carry message
//! fields. `define_port_error!` derives the enum plus a snake_case
//! constructor per variant, so adapters write
//! `TokenStoreError::query("...")` instead of spelling out struct variants.

macro_rules! define_port_error {
    // Entry point: enum definition with `Variant { fields } => "format"` arms.
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };

    // Unit variant: constructor takes no arguments.
    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    // Struct variant: fold the fields into `impl Into<_>` parameters.
    (@constructor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@fold $variant [] [] $( $field : $ty, )*);
    };

    (@fold $variant:ident [$($params:tt)*] [$($inits:tt)*] $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @fold $variant
            [$($params)* $field: impl Into<$ty>,]
            [$($inits)* $field: $field.into(),]
            $($rest)*
        );
    };

    (@fold $variant:ident [$($params:tt)*] [$($inits:tt)*]) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum ExamplePortError {
            Offline { message: String } => "adapter offline: {message}",
            Throttled { retry_after_secs: u32 } => "throttled for {retry_after_secs}s",
            Refused { message: String, status: u32 } => "refused: {message} ({status})",
            Drained => "adapter drained",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExamplePortError::offline("socket closed");
        assert_eq!(err.to_string(), "adapter offline: socket closed");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = ExamplePortError::throttled(30_u32);
        assert_eq!(err.to_string(), "throttled for 30s");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExamplePortError::refused("bad gateway", 502_u32);
        assert_eq!(err.to_string(), "refused: bad gateway (502)");
    }

    #[test]
    fn unit_variants_get_argument_free_constructors() {
        assert_eq!(
            ExamplePortError::drained().to_string(),
            "adapter drained"
        );
    }
}
