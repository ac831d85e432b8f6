//! Registration macro for mappable types.

/// Register a struct as mappable by listing its mapped fields.
///
/// Generates the [`Mappable`](crate::core::Mappable) accessor tables and a
/// [`MapValue`](crate::core::MapValue) implementation so the type can also
/// appear as a nested member of another mappable type. Fields are listed
/// with their types; an optional `directives` block attaches declarative
/// mapping annotations.
///
/// ```rust
/// use objmap::{mappable, MapDirective, Direction};
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Person {
///     name: String,
///     age: i64,
/// }
///
/// mappable! {
///     Person {
///         name: String,
///         age: i64,
///     }
///     directives [
///         MapDirective::new("name", "PersonDto", "full_name", Direction::ToTarget),
///     ]
/// }
/// # #[derive(Debug, Default, Clone)]
/// # struct PersonDto { full_name: String }
/// # mappable! { PersonDto { full_name: String } }
/// ```
#[macro_export]
macro_rules! mappable {
    (
        $ty:ident {
            $( $field:ident : $fty:ty ),* $(,)?
        }
    ) => {
        $crate::mappable!(@impl $ty { $( $field : $fty ),* } directives []);
    };
    (
        $ty:ident {
            $( $field:ident : $fty:ty ),* $(,)?
        }
        directives [ $( $directive:expr ),* $(,)? ]
    ) => {
        $crate::mappable!(@impl $ty { $( $field : $fty ),* } directives [ $( $directive ),* ]);
    };
    (@impl $ty:ident { $( $field:ident : $fty:ty ),* } directives [ $( $directive:expr ),* ]) => {
        impl $crate::core::Mappable for $ty {
            const NAME: &'static str = stringify!($ty);

            fn accessors() -> &'static [$crate::core::Accessor<Self>] {
                static ACCESSORS: &[$crate::core::Accessor<$ty>] = &[
                    $(
                        $crate::core::Accessor {
                            info: $crate::core::MemberInfo {
                                name: stringify!($field),
                                kind: <$fty as $crate::core::MapValue>::KIND,
                            },
                            get: |s: &$ty| $crate::core::MapValue::to_value(&s.$field),
                            set: |t: &mut $ty, v: $crate::core::Value|
                                -> ::std::result::Result<(), $crate::error::ConvertError> {
                                t.$field = <$fty as $crate::core::MapValue>::from_value(v)?;
                                Ok(())
                            },
                        },
                    )*
                ];
                ACCESSORS
            }

            fn member_infos() -> &'static [$crate::core::MemberInfo] {
                static INFOS: &[$crate::core::MemberInfo] = &[
                    $(
                        $crate::core::MemberInfo {
                            name: stringify!($field),
                            kind: <$fty as $crate::core::MapValue>::KIND,
                        },
                    )*
                ];
                INFOS
            }

            fn directives() -> &'static [$crate::core::MapDirective] {
                static DIRECTIVES: &[$crate::core::MapDirective] = &[ $( $directive ),* ];
                DIRECTIVES
            }
        }

        impl $crate::core::MapValue for $ty {
            const KIND: $crate::core::ValueKind =
                $crate::core::ValueKind::Object($crate::core::TypeToken::of::<$ty>());

            fn to_value(&self) -> $crate::core::Value {
                $crate::core::Value::Object(::std::boxed::Box::new(self.clone()))
            }

            fn from_value(
                value: $crate::core::Value,
            ) -> ::std::result::Result<Self, $crate::error::ConvertError> {
                match value {
                    $crate::core::Value::Object(obj) => {
                        let actual = $crate::core::StructValue::token(&*obj).name();
                        obj.into_any().downcast::<$ty>().map(|b| *b).map_err(|_| {
                            $crate::error::ConvertError::Mismatch {
                                expected: <$ty as $crate::core::Mappable>::NAME.to_string(),
                                actual: actual.to_string(),
                            }
                        })
                    }
                    other => Err($crate::error::ConvertError::Mismatch {
                        expected: <$ty as $crate::core::Mappable>::NAME.to_string(),
                        actual: other.kind_label(),
                    }),
                }
            }
        }
    };
}
