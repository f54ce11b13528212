//! Useful macros.

/// Define a module of atom names, each constant's value being its own name, along
/// with an `ALL` slice listing every name in declaration order.
///
/// # Examples
/// ```ignore
/// define_atom_names! {
///     pub names {
///         WM_STATE,
///         UTF8_STRING,
///     }
/// }
///
/// assert_eq!(names::WM_STATE, "WM_STATE");
/// assert_eq!(names::ALL, &["WM_STATE", "UTF8_STRING"]);
/// ```
macro_rules! define_atom_names {
    (
        $(#[$meta:meta])*
        pub $mod:ident {
            $($name:ident,)*
        }
    ) => {
        $(#[$meta])*
        #[allow(non_upper_case_globals)]
        pub mod $mod {
            $(pub const $name: &str = stringify!($name);)*

            /// Every name defined in this module.
            pub const ALL: &[&str] = &[$($name,)*];
        }
    };
}
