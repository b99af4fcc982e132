//! Reference tables indexed by id, built once when a screen loads.

use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::model::{
    Contact, ContactId, Country, CountryId, Customer, CustomerId, Division, DivisionId, User,
    UserId,
};
use crate::store::DirectoryStore;

#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: BTreeMap<UserId, User>,
    customers: BTreeMap<CustomerId, Customer>,
    contacts: BTreeMap<ContactId, Contact>,
    countries: BTreeMap<CountryId, Country>,
    divisions: BTreeMap<DivisionId, Division>,
}

impl Directory {
    pub fn load<S: DirectoryStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(Self {
            users: store.users()?.into_iter().map(|u| (u.id, u)).collect(),
            customers: store.customers()?.into_iter().map(|c| (c.id, c)).collect(),
            contacts: store.contacts()?.into_iter().map(|c| (c.id, c)).collect(),
            countries: store.countries()?.into_iter().map(|c| (c.id, c)).collect(),
            divisions: store.divisions()?.into_iter().map(|d| (d.id, d)).collect(),
        })
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.get(&id)
    }

    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.get(&id)
    }

    pub fn country(&self, id: CountryId) -> Option<&Country> {
        self.countries.get(&id)
    }

    pub fn division(&self, id: DivisionId) -> Option<&Division> {
        self.divisions.get(&id)
    }

    /// The country a division belongs to.
    pub fn division_country(&self, id: DivisionId) -> Option<&Country> {
        self.division(id).and_then(|d| self.country(d.country_id))
    }

    /// Contacts in id order.
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    pub fn divisions(&self) -> impl Iterator<Item = &Division> {
        self.divisions.values()
    }

    /// Divisions in one country, in id order.
    pub fn divisions_in(&self, country: CountryId) -> impl Iterator<Item = &Division> {
        self.divisions
            .values()
            .filter(move |d| d.country_id == country)
    }

    /// Match a login by user name and password.
    pub fn authenticate(&self, user_name: &str, password: &str) -> Option<&User> {
        self.users
            .values()
            .find(|u| u.name == user_name && u.password == password)
    }
}
