use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, QueryOrder,
    Set, TransactionError, TransactionTrait,
};
use tracing::{debug, error, warn};

use crate::{
    entities::{movie, user},
    error::{DataError, DataResult},
    models::{Movie, MovieUpdate, NewMovie, NewUser, User},
};

/// Storage contract for users and their movies.
///
/// Every call is its own unit of work: it either commits completely or
/// leaves the store as it found it. Failures are logged before they are
/// returned.
#[async_trait]
pub trait DataManager: Send + Sync {
    /// All users in insertion order.
    async fn list_users(&self) -> DataResult<Vec<User>>;

    /// Movies owned by `user_id`. Fails with [`DataError::UserNotFound`]
    /// rather than returning an empty list for an unknown user.
    async fn list_movies_for_user(&self, user_id: i32) -> DataResult<Vec<Movie>>;

    async fn get_user(&self, user_id: i32) -> DataResult<User>;

    async fn get_movie(&self, movie_id: i32) -> DataResult<Movie>;

    async fn add_user(&self, user: NewUser) -> DataResult<User>;

    async fn add_movie(&self, movie: NewMovie) -> DataResult<Movie>;

    /// Overwrites name, director, year and rating. Poster and owner are kept.
    async fn update_movie(&self, update: MovieUpdate) -> DataResult<Movie>;

    async fn delete_movie(&self, movie_id: i32) -> DataResult<()>;
}

#[derive(Clone)]
pub struct SqliteDataManager {
    db: DatabaseConnection,
}

impl SqliteDataManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DataManager for SqliteDataManager {
    async fn list_users(&self) -> DataResult<Vec<User>> {
        let result = self
            .db
            .transaction::<_, Vec<User>, DataError>(move |txn| {
                Box::pin(async move {
                    let users =
                        user::Entity::find().order_by_asc(user::Column::Id).all(txn).await?;
                    Ok(users.into_iter().map(User::from).collect())
                })
            })
            .await;
        settle("list_users", result)
    }

    async fn list_movies_for_user(&self, user_id: i32) -> DataResult<Vec<Movie>> {
        let result = self
            .db
            .transaction::<_, Vec<Movie>, DataError>(move |txn| {
                Box::pin(async move {
                    let owner = user::Entity::find_by_id(user_id)
                        .one(txn)
                        .await?
                        .ok_or(DataError::UserNotFound(user_id))?;
                    let movies = owner
                        .find_related(movie::Entity)
                        .order_by_asc(movie::Column::Id)
                        .all(txn)
                        .await?;
                    Ok(movies.into_iter().map(Movie::from).collect())
                })
            })
            .await;
        settle("list_movies_for_user", result)
    }

    async fn get_user(&self, user_id: i32) -> DataResult<User> {
        let result = self
            .db
            .transaction::<_, User, DataError>(move |txn| {
                Box::pin(async move {
                    user::Entity::find_by_id(user_id)
                        .one(txn)
                        .await?
                        .map(User::from)
                        .ok_or(DataError::UserNotFound(user_id))
                })
            })
            .await;
        settle("get_user", result)
    }

    async fn get_movie(&self, movie_id: i32) -> DataResult<Movie> {
        let result = self
            .db
            .transaction::<_, Movie, DataError>(move |txn| {
                Box::pin(async move {
                    movie::Entity::find_by_id(movie_id)
                        .one(txn)
                        .await?
                        .map(Movie::from)
                        .ok_or(DataError::MovieNotFound(movie_id))
                })
            })
            .await;
        settle("get_movie", result)
    }

    async fn add_user(&self, new_user: NewUser) -> DataResult<User> {
        let result = self
            .db
            .transaction::<_, User, DataError>(move |txn| {
                Box::pin(async move {
                    let model =
                        user::ActiveModel { name: Set(new_user.name), ..Default::default() };
                    Ok(model.insert(txn).await?.into())
                })
            })
            .await;
        let user = settle("add_user", result)?;
        debug!(user_id = user.id, "user added");
        Ok(user)
    }

    async fn add_movie(&self, new_movie: NewMovie) -> DataResult<Movie> {
        let result = self
            .db
            .transaction::<_, Movie, DataError>(move |txn| {
                Box::pin(async move {
                    let model = movie::ActiveModel {
                        name: Set(new_movie.name),
                        director: Set(new_movie.director),
                        year: Set(new_movie.year),
                        rating: Set(new_movie.rating),
                        poster: Set(new_movie.poster),
                        user_id: Set(new_movie.user_id),
                        ..Default::default()
                    };
                    Ok(model.insert(txn).await?.into())
                })
            })
            .await;
        let movie = settle("add_movie", result)?;
        debug!(movie_id = movie.id, user_id = movie.user_id, "movie added");
        Ok(movie)
    }

    async fn update_movie(&self, update: MovieUpdate) -> DataResult<Movie> {
        let result = self
            .db
            .transaction::<_, Movie, DataError>(move |txn| {
                Box::pin(async move {
                    let existing = movie::Entity::find_by_id(update.id)
                        .one(txn)
                        .await?
                        .ok_or(DataError::MovieNotFound(update.id))?;
                    let mut model = existing.into_active_model();
                    model.name = Set(update.name);
                    model.director = Set(update.director);
                    model.year = Set(update.year);
                    model.rating = Set(update.rating);
                    Ok(model.update(txn).await?.into())
                })
            })
            .await;
        let movie = settle("update_movie", result)?;
        debug!(movie_id = movie.id, "movie updated");
        Ok(movie)
    }

    async fn delete_movie(&self, movie_id: i32) -> DataResult<()> {
        let result = self
            .db
            .transaction::<_, (), DataError>(move |txn| {
                Box::pin(async move {
                    let existing = movie::Entity::find_by_id(movie_id)
                        .one(txn)
                        .await?
                        .ok_or(DataError::MovieNotFound(movie_id))?;
                    existing.delete(txn).await?;
                    Ok(())
                })
            })
            .await;
        settle("delete_movie", result)?;
        debug!(movie_id, "movie deleted");
        Ok(())
    }
}

/// Flattens a transaction outcome and logs the failure. The transaction has
/// already been rolled back when an error reaches this point.
fn settle<T>(
    operation: &'static str,
    result: Result<T, TransactionError<DataError>>,
) -> DataResult<T> {
    let err = match result {
        Ok(value) => return Ok(value),
        Err(TransactionError::Connection(err)) => DataError::Storage(err),
        Err(TransactionError::Transaction(err)) => err,
    };
    match &err {
        DataError::Storage(db_err) => error!(operation, error = %db_err, "storage error"),
        other => warn!(operation, error = %other, "lookup by id failed"),
    }
    Err(err)
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use super::*;
    use crate::{db, models::UNKNOWN_DIRECTOR};

    async fn manager() -> SqliteDataManager {
        let db = db::connect_and_migrate("sqlite::memory:").await.unwrap();
        SqliteDataManager::new(db)
    }

    fn new_user(name: &str) -> NewUser {
        NewUser { name: name.to_string() }
    }

    fn new_movie(user_id: i32, name: &str) -> NewMovie {
        NewMovie {
            name: name.to_string(),
            director: UNKNOWN_DIRECTOR.to_string(),
            year: 1986,
            rating: 6.9,
            poster: Some(format!("https://posters.example/{}.jpg", name.replace(' ', "_"))),
            user_id,
        }
    }

    #[tokio::test]
    async fn add_user_assigns_fresh_ids_in_insertion_order() {
        let dm = manager().await;

        let john = dm.add_user(new_user("John Doe")).await.unwrap();
        let jane = dm.add_user(new_user("Jane Doe")).await.unwrap();
        assert_ne!(john.id, jane.id);

        let users = dm.list_users().await.unwrap();
        assert_eq!(users, vec![john, jane]);
    }

    #[tokio::test]
    async fn list_users_is_empty_on_a_fresh_store() {
        let dm = manager().await;
        assert!(dm.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn movies_are_listed_per_owner() {
        let dm = manager().await;
        let john = dm.add_user(new_user("John Doe")).await.unwrap();
        let jane = dm.add_user(new_user("Jane Doe")).await.unwrap();

        let top_gun = dm.add_movie(new_movie(john.id, "Top Gun")).await.unwrap();
        let heat = dm.add_movie(new_movie(jane.id, "Heat")).await.unwrap();

        assert_eq!(dm.list_movies_for_user(john.id).await.unwrap(), vec![top_gun]);
        assert_eq!(dm.list_movies_for_user(jane.id).await.unwrap(), vec![heat]);
    }

    #[tokio::test]
    async fn user_without_movies_lists_empty() {
        let dm = manager().await;
        let john = dm.add_user(new_user("John Doe")).await.unwrap();
        assert!(dm.list_movies_for_user(john.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_movies_of_unknown_user_is_not_found() {
        let dm = manager().await;
        let err = dm.list_movies_for_user(42).await.unwrap_err();
        assert!(matches!(err, DataError::UserNotFound(42)));
    }

    #[tokio::test]
    async fn add_movie_for_missing_owner_is_a_storage_error() {
        let dm = manager().await;
        let err = dm.add_movie(new_movie(99, "Orphan")).await.unwrap_err();
        assert!(matches!(err, DataError::Storage(_)));

        let john = dm.add_user(new_user("John Doe")).await.unwrap();
        assert!(dm.list_movies_for_user(john.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_by_id_distinguishes_not_found() {
        let dm = manager().await;
        assert!(matches!(dm.get_user(7).await.unwrap_err(), DataError::UserNotFound(7)));
        assert!(matches!(dm.get_movie(7).await.unwrap_err(), DataError::MovieNotFound(7)));

        let john = dm.add_user(new_user("John Doe")).await.unwrap();
        let movie = dm.add_movie(new_movie(john.id, "Top Gun")).await.unwrap();
        assert_eq!(dm.get_user(john.id).await.unwrap(), john);
        assert_eq!(dm.get_movie(movie.id).await.unwrap(), movie);
    }

    #[tokio::test]
    async fn update_overwrites_only_editable_fields() {
        let dm = manager().await;
        let john = dm.add_user(new_user("John Doe")).await.unwrap();
        let original = dm.add_movie(new_movie(john.id, "Top Gun")).await.unwrap();

        let updated = dm
            .update_movie(MovieUpdate {
                id: original.id,
                name: "Top Gun: Maverick".to_string(),
                director: "Joseph Kosinski".to_string(),
                year: 2022,
                rating: 7.8,
            })
            .await
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.name, "Top Gun: Maverick");
        assert_eq!(updated.director, "Joseph Kosinski");
        assert_eq!(updated.year, 2022);
        assert_eq!(updated.rating, 7.8);
        assert_eq!(updated.poster, original.poster);
        assert_eq!(updated.user_id, original.user_id);
        assert_eq!(dm.get_movie(original.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_of_unknown_movie_leaves_store_unchanged() {
        let dm = manager().await;
        let john = dm.add_user(new_user("John Doe")).await.unwrap();
        let movie = dm.add_movie(new_movie(john.id, "Top Gun")).await.unwrap();

        let err = dm
            .update_movie(MovieUpdate {
                id: movie.id + 100,
                name: "Nope".to_string(),
                director: "Nobody".to_string(),
                year: 1900,
                rating: 0.0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DataError::MovieNotFound(id) if id == movie.id + 100));
        assert_eq!(dm.list_movies_for_user(john.id).await.unwrap(), vec![movie]);
    }

    #[tokio::test]
    async fn delete_removes_movie_from_listing() {
        let dm = manager().await;
        let john = dm.add_user(new_user("John Doe")).await.unwrap();
        let keep = dm.add_movie(new_movie(john.id, "Heat")).await.unwrap();
        let gone = dm.add_movie(new_movie(john.id, "Top Gun")).await.unwrap();

        dm.delete_movie(gone.id).await.unwrap();

        assert_eq!(dm.list_movies_for_user(john.id).await.unwrap(), vec![keep]);
        assert!(matches!(
            dm.delete_movie(gone.id).await.unwrap_err(),
            DataError::MovieNotFound(_)
        ));
    }

    #[tokio::test]
    async fn collection_lifecycle() {
        let dm = manager().await;
        let john = dm.add_user(new_user("John Doe")).await.unwrap();

        dm.add_movie(new_movie(john.id, "Top Gun")).await.unwrap();
        let movies = dm.list_movies_for_user(john.id).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].name, "Top Gun");
        assert_eq!(movies[0].director, UNKNOWN_DIRECTOR);

        dm.update_movie(MovieUpdate {
            id: movies[0].id,
            name: "Top Gun: Maverick".to_string(),
            director: "Joseph Kosinski".to_string(),
            year: 2022,
            rating: 7.8,
        })
        .await
        .unwrap();
        let movies = dm.list_movies_for_user(john.id).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].name, "Top Gun: Maverick");
        assert_eq!(movies[0].director, "Joseph Kosinski");
        assert_eq!(movies[0].year, 2022);
        assert_eq!(movies[0].rating, 7.8);

        dm.delete_movie(movies[0].id).await.unwrap();
        assert!(dm.list_movies_for_user(john.id).await.unwrap().is_empty());
    }

    #[test]
    fn settle_unwraps_connection_failures_into_storage_errors() {
        let result: Result<(), _> =
            Err(TransactionError::Connection(DbErr::Custom("pool closed".to_string())));
        assert!(matches!(settle("list_users", result), Err(DataError::Storage(_))));

        let result: Result<(), _> = Err(TransactionError::Transaction(DataError::MovieNotFound(3)));
        assert!(matches!(settle("delete_movie", result), Err(DataError::MovieNotFound(3))));
    }
}
