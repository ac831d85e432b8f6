//! Shared mappable types for unit tests.

use crate::core::member::{Direction, MapDirective};
use crate::mappable;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: String,
}

mappable! {
    Address {
        city: String,
        zip: String,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AddressDto {
    pub city: String,
    pub zip: String,
}

mappable! {
    AddressDto {
        city: String,
        zip: String,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i64,
    pub address: Address,
}

mappable! {
    Person {
        name: String,
        age: i64,
        address: Address,
    }
}

impl Person {
    pub fn sample() -> Self {
        Person {
            name: "Ada".to_string(),
            age: 36,
            address: Address {
                city: "London".to_string(),
                zip: "N1".to_string(),
            },
        }
    }
}

/// Nested counterpart of [`Person`]; mapping `address` requires the
/// `Address -> AddressDto` pair to be registered.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PersonDto {
    pub name: String,
    pub address: AddressDto,
}

mappable! {
    PersonDto {
        name: String,
        address: AddressDto,
    }
}

/// Flattened counterpart of [`Person`]; `address_planet` deliberately has
/// no match on [`Address`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FlatPerson {
    pub name: String,
    pub age: i64,
    pub address_city: String,
    pub address_planet: i64,
}

mappable! {
    FlatPerson {
        name: String,
        age: i64,
        address_city: String,
        address_planet: i64,
    }
}

/// Carries a directive binding `label` to `Person.name` in both
/// directions.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TaggedRecord {
    pub label: String,
}

mappable! {
    TaggedRecord {
        label: String,
    }
    directives [
        MapDirective::new("label", "Person", "name", Direction::Both),
    ]
}
