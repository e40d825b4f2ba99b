//! `define_port_error!`: declares a port error enum whose variants carry
//! named fields, with a `thiserror` message per variant and a snake_case
//! constructor per variant taking `impl Into<_>` for every field.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum StoreError {
//!         Connection { message: String } => "store offline: {message}",
//!     }
//! }
//!
//! let err = StoreError::connection("pool closed");
//! ```

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

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = "Construct the `" $variant "` variant."]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                )+
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Offline { message: String } => "store offline: {message}",
            Busy { reason: String, retries: u32 } => "busy: {reason} after {retries} tries",
        }
    }

    #[test]
    fn constructors_are_snake_case_and_accept_borrowed_text() {
        let err = SamplePortError::offline("pool closed");
        assert_eq!(
            err,
            SamplePortError::Offline {
                message: "pool closed".to_owned()
            }
        );
        assert_eq!(err.to_string(), "store offline: pool closed");
    }

    #[test]
    fn mixed_fields_render_in_the_message() {
        let err = SamplePortError::busy("pool exhausted", 3_u32);
        assert_eq!(err.to_string(), "busy: pool exhausted after 3 tries");
    }
}
