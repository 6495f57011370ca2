#[macro_export]
macro_rules! primitive_registry_entries {
    ($macro:ident $(, @args $($args:tt)+ )?) => {
        $macro! {
            $(
                @args $($args)+;
            )?
            @entries
            (Bool, Bool, name = "bool", bits = 8),
            (Char, Char, name = "char", bits = 32),
            (Float32, Float, name = "f32", bits = 32),
            (Float64, Float, name = "f64", bits = 64),
            (Int8, Int, name = "i8", bits = 8),
            (Int16, Int, name = "i16", bits = 16),
            (Int32, Int, name = "i32", bits = 32),
            (Int64, Int, name = "i64", bits = 64),
            (Int128, Int, name = "i128", bits = 128),
            (Nat8, Nat, name = "u8", bits = 8),
            (Nat16, Nat, name = "u16", bits = 16),
            (Nat32, Nat, name = "u32", bits = 32),
            (Nat64, Nat, name = "u64", bits = 64),
            (Nat128, Nat, name = "u128", bits = 128),
        }
    };
}

macro_rules! primitive_registry {
    ($macro:ident) => {
        $crate::primitive_registry_entries!($macro)
    };
    ($macro:ident, $($args:tt)+) => {
        $crate::primitive_registry_entries!($macro, @args $($args)+)
    };
}

macro_rules! metadata_from_registry {
    ( @args $kind:expr; @entries $( ($prim:ident, $family:ident, name = $name:expr, bits = $bits:expr) ),* $(,)? ) => {
        match $kind {
            $(
                $crate::Primitive::$prim => $crate::PrimitiveMetadata {
                    family: $crate::PrimitiveFamily::$family,
                    name: $name,
                    bits: $bits,
                },
            )*
        }
    };
}

macro_rules! all_primitives_from_registry {
    ( @entries $( ($prim:ident, $family:ident, name = $name:expr, bits = $bits:expr) ),* $(,)? ) => {
        [ $( $crate::Primitive::$prim ),* ]
    };
}
