//! Arena handles for schema entities.
//!
//! Every stub lives in exactly one arena slot for the lifetime of a
//! `Schema`; references compare by handle, so two references to the same
//! declaration are equal iff they point at the same slot.

use serde::{Deserialize, Serialize};

macro_rules! schema_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

schema_id!(
    /// A module or namespace.
    ContainerId
);
schema_id!(
    /// A class, interface, or type-alias constructor.
    ConstructorId
);
schema_id!(EnumId);
schema_id!(ValueId);
