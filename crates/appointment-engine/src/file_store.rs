//! JSON-file backed store with an explicit open/close lifecycle.
//!
//! [`FileStore::open`] reads the whole dataset, mutations happen in memory, and
//! [`FileStore::close`] writes it back through a temporary file and a rename so
//! a crash mid-write never leaves a truncated dataset behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::model::{
    Appointment, AppointmentDraft, AppointmentId, Contact, ContactId, Country, Customer,
    CustomerDraft, CustomerId, Division, User,
};
use crate::store::{AppointmentStore, Dataset, DirectoryStore, MemoryStore};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
    dirty: bool,
}

impl FileStore {
    /// Load the dataset at `path`. A missing file opens as an empty dataset.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<Dataset>(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Dataset::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!(
            path = %path.display(),
            appointments = data.appointments.len(),
            "opened dataset"
        );
        Ok(Self {
            path,
            inner: MemoryStore::from_dataset(data),
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dataset(&self) -> &Dataset {
        self.inner.dataset()
    }

    /// Write pending changes and release the handle.
    pub fn close(self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(self.inner.dataset())?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "dataset saved");
        Ok(())
    }
}

/// Open the store at `path`, run `f`, and close it.
///
/// Changes are written only when `f` succeeds; on error the handle is dropped
/// and the file on disk is left as it was.
pub fn with_file_store<T, E, F>(path: impl AsRef<Path>, f: F) -> Result<T, E>
where
    E: From<StoreError>,
    F: FnOnce(&mut FileStore) -> Result<T, E>,
{
    let mut store = FileStore::open(path)?;
    let value = f(&mut store)?;
    store.close()?;
    Ok(value)
}

impl AppointmentStore for FileStore {
    fn get(&self, id: AppointmentId) -> Result<Option<Appointment>, StoreError> {
        self.inner.get(id)
    }

    fn list(&self) -> Result<Vec<Appointment>, StoreError> {
        self.inner.list()
    }

    fn list_by_customer(&self, customer: CustomerId) -> Result<Vec<Appointment>, StoreError> {
        self.inner.list_by_customer(customer)
    }

    fn list_by_contact(&self, contact: ContactId) -> Result<Vec<Appointment>, StoreError> {
        self.inner.list_by_contact(contact)
    }

    fn find_overlapping(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<AppointmentId>,
    ) -> Result<Vec<Appointment>, StoreError> {
        self.inner.find_overlapping(start, end, exclude)
    }

    fn insert(&mut self, draft: AppointmentDraft) -> Result<Appointment, StoreError> {
        let appointment = self.inner.insert(draft)?;
        self.dirty = true;
        Ok(appointment)
    }

    fn update(&mut self, appointment: &Appointment) -> Result<(), StoreError> {
        self.inner.update(appointment)?;
        self.dirty = true;
        Ok(())
    }

    fn delete(&mut self, id: AppointmentId) -> Result<Option<Appointment>, StoreError> {
        let removed = self.inner.delete(id)?;
        self.dirty |= removed.is_some();
        Ok(removed)
    }

    fn delete_by_customer(&mut self, customer: CustomerId) -> Result<usize, StoreError> {
        let removed = self.inner.delete_by_customer(customer)?;
        self.dirty |= removed > 0;
        Ok(removed)
    }
}

impl DirectoryStore for FileStore {
    fn users(&self) -> Result<Vec<User>, StoreError> {
        self.inner.users()
    }

    fn customers(&self) -> Result<Vec<Customer>, StoreError> {
        self.inner.customers()
    }

    fn contacts(&self) -> Result<Vec<Contact>, StoreError> {
        self.inner.contacts()
    }

    fn countries(&self) -> Result<Vec<Country>, StoreError> {
        self.inner.countries()
    }

    fn divisions(&self) -> Result<Vec<Division>, StoreError> {
        self.inner.divisions()
    }

    fn insert_customer(&mut self, draft: CustomerDraft) -> Result<Customer, StoreError> {
        let customer = self.inner.insert_customer(draft)?;
        self.dirty = true;
        Ok(customer)
    }

    fn update_customer(&mut self, customer: &Customer) -> Result<(), StoreError> {
        self.inner.update_customer(customer)?;
        self.dirty = true;
        Ok(())
    }

    fn delete_customer(&mut self, id: CustomerId) -> Result<bool, StoreError> {
        let removed = self.inner.delete_customer(id)?;
        self.dirty |= removed;
        Ok(removed)
    }
}
