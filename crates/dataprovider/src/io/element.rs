use safetensors::Dtype;

/// Element types that can be stored in an array container.
pub trait Element: bytemuck::Pod {
    /// On-disk dtype tag.
    const DTYPE: Dtype;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: Dtype = Dtype::$dtype;
            }
        )*
    };
}

impl_element! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}
