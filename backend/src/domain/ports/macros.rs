//! `define_port_error!`: generates a port error enum with `thiserror`
//! messages and snake_case constructors taking `impl Into<T>` fields.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
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
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Unreachable { message: String } => "store unreachable: {message}",
            Stale { defect_id: i64 } => "defect {defect_id} changed",
            Rejected { message: String, attempts: u32 } => "rejected: {message} after {attempts}",
            Closed => "store closed",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SamplePortError::unreachable("timeout");
        assert_eq!(err.to_string(), "store unreachable: timeout");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        let err = SamplePortError::stale(7_i64);
        assert_eq!(err, SamplePortError::Stale { defect_id: 7 });
    }

    #[test]
    fn mixed_and_unit_variants_have_constructors() {
        assert_eq!(
            SamplePortError::rejected("duplicate", 2_u32).to_string(),
            "rejected: duplicate after 2"
        );
        assert_eq!(SamplePortError::closed().to_string(), "store closed");
    }
}
