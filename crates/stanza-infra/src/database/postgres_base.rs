use std::marker::PhantomData;

use sea_orm::{DbConn, DbErr, EntityTrait, PrimaryKeyTrait};

use stanza_core::error::RepoError;

/// Generic PostgreSQL repository implementation.
///
/// Holds the shared lookup/delete plumbing over any entity with an integer
/// primary key; the port traits are implemented on concrete aliases of it.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
{
    pub(crate) async fn find_model_by_id(&self, id: i32) -> Result<Option<E::Model>, RepoError> {
        E::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)
    }

    pub(crate) async fn delete_by_id(&self, id: i32) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

/// Map a SeaORM error onto the repository error surface. Referential
/// failures (a post pointing at a category that does not exist) come back
/// from Postgres as foreign key violations.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    if matches!(err, DbErr::RecordNotUpdated) {
        return RepoError::NotFound;
    }

    let msg = err.to_string();
    if msg.contains("foreign key") {
        RepoError::Constraint("referenced category does not exist".to_string())
    } else if msg.contains("duplicate") || msg.contains("unique") {
        RepoError::Constraint("entity already exists".to_string())
    } else {
        RepoError::Query(msg)
    }
}
