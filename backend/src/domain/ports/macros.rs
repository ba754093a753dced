//! Port error generation.
//!
//! `define_port_error!` turns a compact variant list into a `thiserror` enum
//! with one snake_case constructor per variant. Storage ports name their
//! store after `for`; they gain the shared `Connection` and `Query` variants
//! plus an `into_api_error` mapping for them, so services only spell out the
//! variants that mean something to callers.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum VoteStoreError for "vote store" {
//!         DuplicateVote => "a vote from this member already exists",
//!     }
//! }
//! let error = VoteStoreError::connection("pool closed");
//! assert_eq!(error.to_string(), "vote store connection failed: pool closed");
//! ```

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
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

    (
        $(#[$outer:meta])*
        pub enum $name:ident for $store:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            /// The store could not be reached.
            #[error("{store} connection failed: {message}", store = $store)]
            Connection { message: String },
            /// A query or mutation failed while executing.
            #[error("{store} query failed: {message}", store = $store)]
            Query { message: String },
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            define_port_error!(@ctor Connection { message: String });
            define_port_error!(@ctor Query { message: String });
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// API error for failures that carry no port-specific meaning.
            ///
            /// Unreachable stores become `service_unavailable`; everything
            /// else becomes `internal_error`, which the HTTP layer redacts.
            pub(crate) fn into_api_error(self) -> $crate::domain::Error {
                match self {
                    Self::Connection { message } => $crate::domain::Error::service_unavailable(
                        format!("{} unavailable: {message}", $store),
                    ),
                    Self::Query { message } => {
                        $crate::domain::Error::internal(format!("{} error: {message}", $store))
                    }
                    #[allow(unreachable_patterns, reason = "stores with no extra variants")]
                    other => $crate::domain::Error::internal(other.to_string()),
                }
            }
        }
    };
}

pub(crate) use define_port_error;
