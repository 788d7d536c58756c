//! Utility macros shared across the workspace.

/// Generates getters that return `[f64]`-like fields as an `Array1<f64>`.
#[macro_export]
macro_rules! array1d_getter_impl {
    ($fun_name:ident, $($field:ident).+) => {
        #[doc = "Returns the `"]
        #[doc = stringify!($($field).+)]
        #[doc = "` array." ]
        pub fn $fun_name(&self) -> Array1<f64> {
            Array1::from_iter(self.$($field).+.iter().copied())
        }
    }
}

/// Generates getters that return `Array2<f64>` fields by cloning.
#[macro_export]
macro_rules! array2d_getter_impl {
    ($fun_name:ident, $($field:ident).+) => {
        #[doc = "Returns the `"]
        #[doc = stringify!($($field).+)]
        #[doc = "` array." ]
        pub fn $fun_name(&self) -> Array2<f64> {
            self.$($field).+.clone()
        }
    }
}
