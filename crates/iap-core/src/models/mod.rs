//! Shared data models for both protocol roles

/// Declares a fieldless wire enumeration with its raw conversions.
///
/// Generates `From<Enum> for raw` and `TryFrom<raw> for Enum`, the latter
/// failing with [`ProtocolError::UnknownValue`](crate::ProtocolError) so that
/// callers decide what an unknown value means in their context. Extra
/// derives such as `Default` go on the enum as attributes, with `#[default]`
/// on the variant.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $repr:ty {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[repr($repr)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> Self {
                value as $repr
            }
        }

        impl TryFrom<$repr> for $name {
            type Error = $crate::error::ProtocolError;

            fn try_from(value: $repr) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(Self::$variant), )+
                    other => Err($crate::error::ProtocolError::UnknownValue {
                        kind: stringify!($name),
                        value: u32::from(other),
                    }),
                }
            }
        }
    };
}

mod codes;
mod command;
mod mode;
mod packet;
mod params;

pub use codes::*;
pub use command::*;
pub use mode::*;
pub use packet::*;
pub use params::*;
