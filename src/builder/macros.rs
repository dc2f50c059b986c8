//! Macros for ergonomic state machine construction.

/// Generate a `State` implementation for a plain enum.
///
/// Each variant is named after itself. An optional `wildcard:` clause marks
/// the variant that stands for "any state" in transition sources.
///
/// # Example
///
/// ```
/// use statewright::core::State;
/// use statewright::state_enum;
///
/// state_enum! {
///     pub enum OrderState {
///         Any,
///         Created,
///         Paid,
///         Shipped,
///     }
///     wildcard: Any
/// }
///
/// assert_eq!(OrderState::Paid.name(), "Paid");
/// assert!(OrderState::Any.is_wildcard());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(wildcard: $wildcard:ident)?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            #[allow(unreachable_patterns)]
            fn is_wildcard(&self) -> bool {
                match self {
                    $(Self::$wildcard => true,)?
                    _ => false,
                }
            }
        }
    };
}
