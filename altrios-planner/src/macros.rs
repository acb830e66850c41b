/// Generates a String similar to output of `dbg` but without printing
#[macro_export]
macro_rules! format_dbg {
    ($dbg_expr:expr) => {
        format!(
            "[{}:{}] {}: {:?}",
            file!(),
            line!(),
            stringify!($dbg_expr),
            $dbg_expr
        )
    };
    () => {
        format!("[{}:{}]", file!(), line!())
    };
}

/// Declares a `uom` unit constant with value expressed in base SI units
macro_rules! unit_const {
    ($name:ident, $($T:ident)::+, $value:expr) => {
        pub const $name: $($T)::+ = $($T)::+ {
            dimension: std::marker::PhantomData,
            units: std::marker::PhantomData,
            value: $value,
        };
    };
}
