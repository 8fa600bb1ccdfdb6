/// Duplicate an [item](https://doc.rust-lang.org/nightly/reference/items.html) `$imp` for each
/// component type `$C`, making it available within `$imp` under the alias `$CAlias`.
///
/// Please use traits instead of this, where reasonable.
#[macro_export]
macro_rules! item_with {
    {$CAlias:ident: $($C:ty),+ => $imp:item} => {
        $(
            const _: () = { // anonymous module
                type $CAlias = $C;
                $imp
            };
        )+
    };
}

/// [item_with], over every primitive that can back an accessor component.
#[macro_export]
macro_rules! item_with_components {
    {$CAlias:ident => $imp:item} => {
        $crate::item_with! {$CAlias: i8, u8, i16, u16, i32, u32, f32, f64 => $imp}
    };
}
