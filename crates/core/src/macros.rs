// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros for reducing boilerplate.
//!
//! - [`simple_display!`]: `Display` impl mapping enum variants to string literals
//! - [`setters!`]: setter methods for configuration structs

/// Generate a `Display` impl that maps enum variants to string literals.
///
/// Unit variants match directly; data-carrying variants use `{ .. }` to ignore fields.
///
/// ```ignore
/// bc_core::simple_display! {
///     TriggerKind {
///         ConfigChange => "ConfigChange",
///         ImageChange { .. } => "ImageChange",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident $({ $($ignore:tt)* })? => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant $({ $($ignore)* })? => $str, )+
                })
            }
        }
    };
}

/// Generate chained setters inside an existing `impl` block.
///
/// `set` fields take the value as is; `option` fields are `Option<T>` and the
/// setter stores `Some(v.into())`.
///
/// ```ignore
/// impl ControllerConfig {
///     bc_core::setters! {
///         set { workers: usize }
///         option { namespace: String }
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    (
        $(set {
            $( $set_field:ident : $set_ty:ty ),* $(,)?
        })?
        $(option {
            $( $opt_field:ident : $opt_ty:ty ),* $(,)?
        })?
    ) => {
        $($(
            pub fn $set_field(mut self, v: $set_ty) -> Self {
                self.$set_field = v;
                self
            }
        )*)?

        $($(
            pub fn $opt_field(mut self, v: impl Into<$opt_ty>) -> Self {
                self.$opt_field = Some(v.into());
                self
            }
        )*)?
    };
}
