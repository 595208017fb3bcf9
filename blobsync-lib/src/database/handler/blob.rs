use crate::database::schema::blobs;
use crate::database::schema::blobs::dsl::*;
use crate::error::Error;
use crate::model::Blob;
use crate::model::BlobDatabase;
use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel::r2d2::Pool;
use diesel::PgConnection;

/// Result of inserting a blob; `Skipped` if a row with the same ID already existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Skipped,
}

pub struct BlobHandler<'a> {
    connection: &'a Pool<ConnectionManager<PgConnection>>,
}

impl<'a> BlobHandler<'a> {
    pub fn new(connection: &'a Pool<ConnectionManager<PgConnection>>) -> Self {
        BlobHandler { connection }
    }

    /// Inserts the blob unless its ID is already present, in which case the existing row stays untouched.
    pub fn insert(&self, entity: &Blob) -> Result<InsertOutcome, Error> {
        let connection = self.connection.get().map_err(Error::DatabaseUnavailable)?;
        let affected = diesel::insert_into(blobs::table)
            .values(&entity.to_insertable())
            .on_conflict(id)
            .do_nothing()
            .execute(&connection)
            .map_err(|err| Error::DatabasePersist(entity.id, err))?;

        match affected {
            0 => Ok(InsertOutcome::Skipped),
            _ => Ok(InsertOutcome::Inserted),
        }
    }

    pub fn get(&self, entity_id: i64) -> Result<Option<BlobDatabase>, Error> {
        let connection = self.connection.get().map_err(Error::DatabaseUnavailable)?;
        blobs.find(entity_id).first(&connection).optional().map_err(Error::DatabaseQuery)
    }

    pub fn count(&self) -> Result<i64, Error> {
        let connection = self.connection.get().map_err(Error::DatabaseUnavailable)?;
        blobs.count().get_result(&connection).map_err(Error::DatabaseQuery)
    }
}
