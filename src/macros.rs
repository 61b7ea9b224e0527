/// Implements `Copy`, array conversions and (with the `unsafe` feature) zero-copy
/// slice views for a `#[repr(C)]` struct whose `$len` fields all share the type parameter.
///
/// The fields must be listed in declaration order. The struct is expected to derive
/// `UniformArray` for indexed access.
#[macro_export]
macro_rules! impl_component_views {
    ($type_name:ident, $type_param:ident, $len:literal, [$($field:ident),+]) => {
        impl<$type_param> Copy for $type_name<$type_param> where $type_param: Copy {}

        impl<$type_param> $type_name<$type_param> {
            /// The number of components.
            pub const COMPONENTS: usize = $len;

            /// Constructs a new instance from its components, in declaration order.
            #[inline]
            pub fn from_array(components: [$type_param; $len]) -> Self {
                let [$($field),+] = components;
                Self { $($field),+ }
            }

            /// Returns the components in declaration order.
            #[inline]
            pub fn to_array(&self) -> [$type_param; $len]
            where
                $type_param: Copy,
            {
                [$(self.$field),+]
            }
        }

        impl<$type_param> From<[$type_param; $len]> for $type_name<$type_param> {
            #[inline]
            fn from(value: [$type_param; $len]) -> Self {
                Self::from_array(value)
            }
        }

        impl<$type_param> From<$type_name<$type_param>> for [$type_param; $len]
        where
            $type_param: Copy,
        {
            #[inline]
            fn from(value: $type_name<$type_param>) -> Self {
                value.to_array()
            }
        }

        #[cfg_attr(docsrs, doc(cfg(feature = "unsafe")))]
        #[cfg(feature = "unsafe")]
        impl<$type_param> $type_name<$type_param> {
            /// Interprets the start of a buffer as this type.
            ///
            /// ## Panics
            /// Panics if the slice does not hold exactly the number of components.
            #[allow(unused)]
            #[inline]
            pub fn from_slice(slice: &[$type_param]) -> &Self {
                assert_eq!(slice.len(), $len, "slice length must match component count");

                // SAFETY: $type_name only contains `$type_param` fields and is `repr(C)`
                unsafe { &*(slice.as_ptr() as *const Self) }
            }

            /// Interprets the start of a mutable buffer as this type.
            ///
            /// ## Panics
            /// Panics if the slice does not hold exactly the number of components.
            #[allow(unused)]
            #[inline]
            pub fn from_mut_slice(slice: &mut [$type_param]) -> &mut Self {
                assert_eq!(slice.len(), $len, "slice length must match component count");

                // SAFETY: $type_name only contains `$type_param` fields and is `repr(C)`
                unsafe { &mut *(slice.as_mut_ptr() as *mut Self) }
            }

            /// Views the components as a slice.
            #[inline]
            pub fn as_slice(&self) -> &[$type_param] {
                // SAFETY: $type_name only contains `$type_param` fields and is `repr(C)`
                unsafe { core::slice::from_raw_parts(self as *const _ as *const $type_param, $len) }
            }

            /// Views the components as a mutable slice.
            #[inline]
            pub fn as_mut_slice(&mut self) -> &mut [$type_param] {
                // SAFETY: $type_name only contains `$type_param` fields and is `repr(C)`
                unsafe {
                    core::slice::from_raw_parts_mut(self as *mut _ as *mut $type_param, $len)
                }
            }
        }

        #[cfg(test)]
        paste::paste! {
            #[cfg(test)]
            mod [<tests_gen_ $type_name:snake>] {
                use super::*;

                #[test]
                fn test_array_conversion() {
                    let mut components = [0.0_f64; $len];
                    for (index, component) in components.iter_mut().enumerate() {
                        *component = index as f64 + 1.0;
                    }

                    let value = $type_name::from_array(components);
                    for index in 0..$len {
                        assert_eq!(value[index], index as f64 + 1.0);
                    }

                    let back: [f64; $len] = value.into();
                    assert_eq!(back, components);
                }

                #[test]
                #[cfg(feature = "unsafe")]
                fn test_from_slice() {
                    let data = [7.0_f32; $len + 1];
                    let view = $type_name::from_slice(&data[..$len]);
                    assert_eq!(view.as_slice().len(), $len);
                    assert!(core::ptr::eq(view.as_slice().as_ptr(), data.as_ptr()));
                }

                #[test]
                #[cfg(feature = "unsafe")]
                fn test_from_mut_slice() {
                    let mut data = [0.0_f32; $len + 1];
                    let start = data.as_ptr();
                    {
                        let view = $type_name::from_mut_slice(&mut data[..$len]);
                        view[0] = 10.0;
                        assert!(core::ptr::eq(view.as_slice().as_ptr(), start));
                    }
                    assert_eq!(data[0], 10.0, "expect data to be changed");
                }
            }
        }
    };
}
