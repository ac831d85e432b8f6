//! Member accessor tables and the registration surface for mappable types.
//!
//! Discovery never introspects structs at runtime. Each mapped type
//! registers a static table of [`Accessor`]s (normally via the
//! [`crate::mappable!`] macro); discovery algorithms operate purely over
//! those tables, obtained once per type pair.

use std::any::{Any, TypeId};
use std::fmt;

use crate::core::value::{Value, ValueKind};
use crate::error::ConvertError;

/// Name and declared kind of one member, as recorded in accessor tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberInfo {
    pub name: &'static str,
    pub kind: ValueKind,
}

/// Typed accessor for one member of `T`: metadata plus get/set functions.
pub struct Accessor<T> {
    pub info: MemberInfo,
    pub get: fn(&T) -> Value,
    pub set: fn(&mut T, Value) -> std::result::Result<(), ConvertError>,
}

/// Erased handle to a mappable type.
///
/// Carries the type name, its `TypeId` and its member table, all
/// obtainable without an instance. Object-kinded members embed a token so
/// flattening and nested discovery can inspect the inner type statically.
#[derive(Clone, Copy)]
pub struct TypeToken {
    name: &'static str,
    id: fn() -> TypeId,
    info_fn: fn() -> &'static [MemberInfo],
}

impl TypeToken {
    /// Create the token for a mappable type.
    pub const fn of<T: Mappable>() -> Self {
        TypeToken {
            name: T::NAME,
            id: TypeId::of::<T>,
            info_fn: T::member_infos,
        }
    }

    /// Registered type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Concrete `TypeId` of the underlying type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        (self.id)()
    }

    /// Member metadata table of the underlying type.
    #[must_use]
    pub fn members(&self) -> &'static [MemberInfo] {
        (self.info_fn)()
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for TypeToken {}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken({})", self.name)
    }
}

/// Which direction a mapping directive applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Value flows from the annotated member into the named counterpart.
    ToTarget,
    /// Value flows from the named counterpart into the annotated member.
    ToSource,
    Both,
}

impl Direction {
    /// Directive applies when the annotated type is the mapping source.
    #[must_use]
    pub fn maps_forward(self) -> bool {
        matches!(self, Direction::ToTarget | Direction::Both)
    }

    /// Directive applies when the annotated type is the mapping target.
    #[must_use]
    pub fn maps_reverse(self) -> bool {
        matches!(self, Direction::ToSource | Direction::Both)
    }
}

/// Declarative mapping annotation attached to one member.
///
/// `member` is the annotated member on the declaring type; `target_type`
/// and `target_member` name the counterpart on the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapDirective {
    pub member: &'static str,
    pub target_type: &'static str,
    pub target_member: &'static str,
    pub direction: Direction,
}

impl MapDirective {
    /// Declare a mapping between `member` and `target_type.target_member`.
    pub const fn new(
        member: &'static str,
        target_type: &'static str,
        target_member: &'static str,
        direction: Direction,
    ) -> Self {
        MapDirective {
            member,
            target_type,
            target_member,
            direction,
        }
    }
}

/// A type that can participate in mapping.
///
/// Implementations are normally generated by [`crate::mappable!`], which
/// registers the accessor table, the member metadata table and any
/// declarative directives. `Default` provides the zero-argument target
/// construction used by `map(source) -> target`.
pub trait Mappable: Default + Clone + Send + Sync + Any + Sized {
    /// Registered type name, used for configuration lookup, directives and
    /// error context.
    const NAME: &'static str;

    /// Typed accessor table, in declaration order.
    fn accessors() -> &'static [Accessor<Self>];

    /// Member metadata table, in declaration order.
    fn member_infos() -> &'static [MemberInfo];

    /// Declarative mapping directives attached to this type's members.
    fn directives() -> &'static [MapDirective] {
        &[]
    }

    /// Erased handle to this type.
    fn token() -> TypeToken {
        TypeToken::of::<Self>()
    }

    /// Look up an accessor by member name.
    fn accessor(name: &str) -> Option<&'static Accessor<Self>> {
        Self::accessors().iter().find(|a| a.info.name == name)
    }
}

/// Erased object surface over a mappable instance.
///
/// Lets converters read and write members of nested objects, and nested
/// mappers recover the concrete type, without generics at the call site.
pub trait StructValue: Any + Send + Sync {
    /// Token of the concrete type.
    fn token(&self) -> TypeToken;

    /// Read a member by name.
    fn get_member(&self, name: &str) -> Option<Value>;

    /// Write a member by name.
    fn set_member(&mut self, name: &str, value: Value)
        -> std::result::Result<(), ConvertError>;

    /// Clone into a new boxed instance.
    fn clone_box(&self) -> Box<dyn StructValue>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Mappable> StructValue for T {
    fn token(&self) -> TypeToken {
        T::token()
    }

    fn get_member(&self, name: &str) -> Option<Value> {
        T::accessor(name).map(|a| (a.get)(self))
    }

    fn set_member(
        &mut self,
        name: &str,
        value: Value,
    ) -> std::result::Result<(), ConvertError> {
        match T::accessor(name) {
            Some(a) => (a.set)(self, value),
            None => Err(ConvertError::UnknownMember {
                type_name: T::NAME.to_string(),
                member: name.to_string(),
            }),
        }
    }

    fn clone_box(&self) -> Box<dyn StructValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
