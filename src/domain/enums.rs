use super::descriptor::EnumDescriptor;

/// An enumeration whose named values the enum editors can enumerate.
///
/// Implemented by [`dialog_enum!`](crate::dialog_enum); flag sets go through
/// [`dialog_flags!`](crate::dialog_flags) instead and are described directly.
pub trait DialogEnum: Copy + Eq + 'static {
    const TYPE_NAME: &'static str;

    fn variants() -> &'static [(&'static str, Self)];

    fn bits(self) -> u64;

    fn from_bits(bits: u64) -> Option<Self> {
        Self::variants()
            .iter()
            .find(|(_, variant)| variant.bits() == bits)
            .map(|(_, variant)| *variant)
    }

    fn enum_descriptor() -> EnumDescriptor {
        EnumDescriptor {
            type_name: Self::TYPE_NAME,
            variants: Self::variants()
                .iter()
                .map(|(name, variant)| ((*name).to_string(), variant.bits()))
                .collect(),
            flags: false,
        }
    }
}

/// Declares a plain enum with explicit discriminants and wires it into the
/// dialog type system. The first variant is the default.
///
/// ```
/// dialogui::dialog_enum! {
///     #[derive(Debug)]
///     pub enum Quality { Low = 0, High = 2 }
/// }
/// ```
#[macro_export]
macro_rules! dialog_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $first:ident = $first_value:expr $(, $variant:ident = $value:expr)* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u64)]
        $vis enum $name {
            $first = $first_value,
            $($variant = $value,)*
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                $name::$first
            }
        }

        impl $crate::domain::DialogEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn variants() -> &'static [(&'static str, Self)] {
                &[
                    (stringify!($first), $name::$first),
                    $((stringify!($variant), $name::$variant),)*
                ]
            }

            fn bits(self) -> u64 {
                self as u64
            }
        }

        impl $crate::domain::Reflect for $name {
            fn descriptor() -> $crate::domain::TypeDescriptor {
                $crate::domain::TypeDescriptor::Enum(
                    <$name as $crate::domain::DialogEnum>::enum_descriptor(),
                )
            }

            fn to_value(&self) -> $crate::domain::DialogValue {
                $crate::domain::DialogValue::Enum(<$name as $crate::domain::DialogEnum>::bits(*self))
            }

            fn from_value(value: &$crate::domain::DialogValue) -> Option<Self> {
                <$name as $crate::domain::DialogEnum>::from_bits(value.as_bits()?)
            }
        }
    };
}

/// Wires a `bitflags` type into the dialog type system as a flag set.
///
/// Every named flag, composites included, becomes a checkbox. Unknown bits
/// are retained on read-back.
#[macro_export]
macro_rules! dialog_flags {
    ($name:ty) => {
        impl $crate::domain::Reflect for $name {
            fn descriptor() -> $crate::domain::TypeDescriptor {
                use $crate::bitflags::Flags as _;
                $crate::domain::TypeDescriptor::Enum($crate::domain::EnumDescriptor {
                    type_name: stringify!($name),
                    variants: <$name>::FLAGS
                        .iter()
                        .filter(|flag| !flag.name().is_empty())
                        .map(|flag| (flag.name().to_string(), u64::from(flag.value().bits())))
                        .collect(),
                    flags: true,
                })
            }

            fn to_value(&self) -> $crate::domain::DialogValue {
                $crate::domain::DialogValue::Enum(u64::from(self.bits()))
            }

            fn from_value(value: &$crate::domain::DialogValue) -> Option<Self> {
                use $crate::bitflags::Flags as _;
                let bits = value.as_bits()?;
                let raw = <<$name as $crate::bitflags::Flags>::Bits>::try_from(bits).ok()?;
                Some(<$name>::from_bits_retain(raw))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{DialogEnum, DialogValue, Reflect, TypeDescriptor};

    crate::dialog_enum! {
        #[derive(Debug)]
        enum Sparse { A = 3, B = 2, C = 0, D = 4 }
    }

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        struct Perms: u8 {
            const A = 1;
            const B = 2;
            const C = 4;
            const ALL = 7;
        }
    }

    crate::dialog_flags!(Perms);

    #[test]
    fn declared_order_survives_in_descriptor() {
        let meta = Sparse::enum_descriptor();
        let values: Vec<_> = meta.variants.iter().map(|(_, bits)| *bits).collect();
        assert_eq!(values, vec![3, 2, 0, 4]);
        assert_eq!(Sparse::default(), Sparse::A);
        assert_eq!(Sparse::from_value(&DialogValue::Enum(0)), Some(Sparse::C));
        assert_eq!(Sparse::from_value(&DialogValue::Enum(9)), None);
    }

    #[test]
    fn flags_describe_composites_and_keep_unknown_bits() {
        let TypeDescriptor::Enum(meta) = Perms::descriptor() else {
            panic!("flags should describe as enum");
        };
        assert!(meta.flags);
        assert_eq!(meta.variants.len(), 4);
        assert_eq!(meta.name_of(7), Some("ALL"));
        let back = Perms::from_value(&DialogValue::Enum(0b1001)).expect("retained");
        assert_eq!(back.bits(), 0b1001);
    }
}
